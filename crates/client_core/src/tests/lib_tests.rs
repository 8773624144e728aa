use super::*;

use std::{
    env, fs,
    sync::{Arc, Mutex},
    time::{SystemTime, UNIX_EPOCH},
};

#[test]
fn upload_guesses_mime_from_file_name() {
    let png = ImageUpload::new("cape.PNG", vec![1]);
    assert_eq!(png.mime_type.as_deref(), Some("image/png"));
    assert!(png.is_image());

    let text = ImageUpload::new("notes.txt", vec![1]);
    assert_eq!(text.mime_type.as_deref(), Some("text/plain"));
    assert!(!text.is_image());

    let unknown = ImageUpload::new("blob", vec![1]);
    assert_eq!(unknown.mime_type, None);
    assert!(!unknown.is_image());
}

#[tokio::test]
async fn upload_from_path_reads_bytes_and_name() {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("supmanager_upload_test_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    let path = dir.join("portrait.jpg");
    fs::write(&path, [0xFF, 0xD8, 0xFF]).expect("write image");

    let upload = ImageUpload::from_path(&path).await.expect("read");

    assert_eq!(upload.filename, "portrait.jpg");
    assert_eq!(upload.mime_type.as_deref(), Some("image/jpeg"));
    assert_eq!(upload.bytes, vec![0xFF, 0xD8, 0xFF]);

    fs::remove_dir_all(dir).expect("cleanup");
}

struct CountingApi {
    deletes: Mutex<u32>,
}

#[async_trait]
impl CollectionApi for CountingApi {
    async fn list(&self, page: u32, page_size: u32) -> Result<PageWindow<Superhero>, FetchError> {
        let mut window = PageWindow::empty(page_size);
        window.page = page;
        Ok(window)
    }

    async fn get(&self, _id: &HeroId) -> Result<Superhero, FetchError> {
        Err(FetchError::status(404, "Superhero not found"))
    }

    async fn create(
        &self,
        _fields: HeroFields,
        _files: Vec<ImageUpload>,
    ) -> Result<Superhero, FetchError> {
        Err(FetchError::transport("read-only"))
    }

    async fn update(
        &self,
        _id: &HeroId,
        _patch: HeroPatch,
        _files: Vec<ImageUpload>,
        _keep_images: Option<Vec<String>>,
    ) -> Result<Superhero, FetchError> {
        Err(FetchError::transport("read-only"))
    }

    async fn delete(&self, _id: &HeroId) -> Result<DeleteAck, FetchError> {
        *self.deletes.lock().expect("deletes") += 1;
        Ok(DeleteAck { ok: true })
    }
}

#[tokio::test]
async fn shared_api_handle_forwards_calls() {
    let api = Arc::new(CountingApi {
        deletes: Mutex::new(0),
    });
    let controller = PagedCollectionController::new(Arc::clone(&api), 5);

    controller
        .submit_delete(&HeroId::from(1))
        .await
        .expect("delete");

    assert_eq!(*api.deletes.lock().expect("deletes"), 1);
    assert_eq!(controller.page(), 1);
    assert!(controller.view().items().is_empty());
}
