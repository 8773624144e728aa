use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use client_core::{
    config::load_settings,
    draft::{EditSession, HeroDraft, ImageSelection},
    CollectionApi, HttpCollectionApi, ImageUpload, PagedCollectionController,
};
use shared::domain::{HeroId, Superhero};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "supmanager", about = "Manage the superhero collection")]
struct Cli {
    /// Overrides `api_url` from supmanager.toml / APP__API_URL.
    #[arg(long)]
    api_url: Option<String>,
    #[arg(long)]
    page_size: Option<u32>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show one page of the collection.
    List {
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Show {
        id: String,
    },
    Create {
        #[command(flatten)]
        fields: CreateFields,
        /// Image file to upload; repeat for more (up to 5).
        #[arg(long = "image")]
        images: Vec<PathBuf>,
    },
    Edit {
        id: String,
        #[command(flatten)]
        fields: EditFields,
        /// Existing image reference to drop, as printed by `show`.
        #[arg(long = "drop-image")]
        drop_images: Vec<String>,
        #[arg(long = "image")]
        images: Vec<PathBuf>,
        /// Page the record is listed on; refreshed after saving.
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
    Delete {
        id: String,
        #[arg(long, default_value_t = 1)]
        page: u32,
    },
}

#[derive(Args, Debug)]
struct CreateFields {
    #[arg(long, default_value = "")]
    nickname: String,
    #[arg(long, default_value = "")]
    real_name: String,
    /// Comma separated.
    #[arg(long, default_value = "")]
    superpowers: String,
    #[arg(long, default_value = "")]
    origin: String,
    #[arg(long, default_value = "")]
    catch_phrase: String,
}

#[derive(Args, Debug)]
struct EditFields {
    #[arg(long)]
    nickname: Option<String>,
    #[arg(long)]
    real_name: Option<String>,
    #[arg(long)]
    superpowers: Option<String>,
    #[arg(long)]
    origin: Option<String>,
    #[arg(long)]
    catch_phrase: Option<String>,
}

impl EditFields {
    fn apply(self, draft: &mut HeroDraft) {
        if let Some(v) = self.nickname {
            draft.nickname = v;
        }
        if let Some(v) = self.real_name {
            draft.real_name = v;
        }
        if let Some(v) = self.superpowers {
            draft.superpowers = v;
        }
        if let Some(v) = self.origin {
            draft.origin = v;
        }
        if let Some(v) = self.catch_phrase {
            draft.catch_phrase = v;
        }
    }
}

type Controller = PagedCollectionController<HttpCollectionApi>;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(api_url) = cli.api_url {
        settings.api_url = api_url;
    }
    if let Some(page_size) = cli.page_size {
        settings.page_size = page_size;
    }
    let api = HttpCollectionApi::from_settings(&settings).context("invalid settings")?;
    info!(api_url = api.base_url(), page_size = settings.page_size, "using collection api");
    let controller = PagedCollectionController::with_settings(api, &settings);

    match cli.command {
        Command::List { page } => {
            controller.load_page(page).await?;
        }
        Command::Show { id } => {
            let hero = controller.api().get(&HeroId(id)).await?;
            print_hero(&hero);
            return Ok(());
        }
        Command::Create { fields, images } => {
            let draft = HeroDraft {
                nickname: fields.nickname,
                real_name: fields.real_name,
                superpowers: fields.superpowers,
                origin: fields.origin,
                catch_phrase: fields.catch_phrase,
            };
            let validated = draft.validate()?;
            let mut selection = ImageSelection::default();
            let requested = images.len();
            let accepted = selection.add(read_images(&images).await?)?;
            if accepted < requested {
                warn!(requested, accepted, "only the first images were kept");
            }
            let hero = controller
                .submit_create(validated, selection.into_files())
                .await?;
            println!("Created {} ({})", hero.nickname, hero.id);
        }
        Command::Edit {
            id,
            fields,
            drop_images,
            images,
            page,
        } => {
            let hero = controller.api().get(&HeroId(id)).await?;
            let mut session = EditSession::begin(hero);
            fields.apply(&mut session.draft);
            for reference in &drop_images {
                if !session.remove_kept(reference) {
                    warn!(%reference, "not an image of this record; ignored");
                }
            }
            let requested = images.len();
            let accepted = session.add_images(read_images(&images).await?)?;
            if accepted < requested {
                warn!(requested, accepted, "image limit reached; extra files skipped");
            }
            let request = session.into_request()?;

            controller.load_page(page).await?;
            let hero = controller.submit_update(request).await?;
            println!("Saved {} ({})", hero.nickname, hero.id);
        }
        Command::Delete { id, page } => {
            controller.load_page(page).await?;
            let id = HeroId(id);
            controller.submit_delete(&id).await?;
            println!("Deleted {id}");
        }
    }

    print_page(&controller);
    Ok(())
}

async fn read_images(paths: &[PathBuf]) -> Result<Vec<ImageUpload>> {
    let mut uploads = Vec::with_capacity(paths.len());
    for path in paths {
        let upload = ImageUpload::from_path(path)
            .await
            .with_context(|| format!("failed to read image '{}'", path.display()))?;
        uploads.push(upload);
    }
    Ok(uploads)
}

fn print_page(controller: &Controller) {
    let view = controller.view();
    println!(
        "Library of superheroes (page {} of {}, {} total)",
        view.page,
        view.total_pages(),
        view.total()
    );
    if view.items().is_empty() {
        println!("  No superheroes on this page.");
    }
    for hero in view.items() {
        let images = match hero.images.len() {
            0 => String::new(),
            1 => "  [1 image]".to_string(),
            n => format!("  [{n} images]"),
        };
        println!("  {:>8}  {}{images}", hero.id.as_str(), hero.nickname);
    }
    if view.total_pages() > 1 {
        println!("{}", controller.display_model().render());
    }
    if let Some(err) = &view.last_error {
        eprintln!("list refresh failed: {err}");
    }
}

fn print_hero(hero: &Superhero) {
    println!("{} ({})", hero.nickname, hero.id);
    let rows = [
        ("Real name", hero.real_name.as_deref()),
        ("Superpowers", hero.superpowers.as_deref()),
        ("Origin", hero.origin_description.as_deref()),
        ("Catch phrase", hero.catch_phrase.as_deref()),
    ];
    for (label, value) in rows {
        if let Some(value) = value {
            println!("  {label:<13} {value}");
        }
    }
    for image in &hero.images {
        println!("  image         {image}");
    }
}
