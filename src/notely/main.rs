use clap::Parser;
use notely::api::{ConfigAction, NotesApi};
use notely::config::{self, NotelyConfig};
use notely::error::Result;
use notely::logging::{self, Verbosity};
use notely::service::{HttpNotesService, InMemoryNotesService, NotesService};
use notely::session::{NotesSession, SessionOptions};
use notely::tui::{self, App};
use std::path::Path;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing::{debug, info};

mod args;
mod cli;
use args::{Cli, Commands};
use cli::print::{print_config, print_created, print_messages, print_notes};

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

struct AppContext {
    api: NotesApi,
    config: NotelyConfig,
    runtime: Runtime,
    offline: bool,
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    let config_dir = config::config_dir()?;
    let verbosity = Verbosity::from_flag(cli.verbose);

    let browsing = matches!(cli.command, None | Some(Commands::Browse));
    if browsing {
        let log_path = logging::init_file(verbosity, &config_dir)?;
        info!(path = %log_path.display(), "logging to file");
    } else {
        logging::init_stderr(verbosity);
    }

    let ctx = init_context(&cli, &config_dir)?;

    match cli.command {
        None | Some(Commands::Browse) => handle_browse(&ctx),
        Some(Commands::List { search, page }) => handle_list(&ctx, search, page),
        Some(Commands::Create {
            title,
            content,
            tag,
        }) => handle_create(&ctx, title, content, tag),
        Some(Commands::Config { key, value }) => handle_config(&ctx, key, value),
    }
}

fn init_context(cli: &Cli, config_dir: &Path) -> Result<AppContext> {
    let config = NotelyConfig::load_with_env(config_dir)?;
    debug!(base_url = %config.base_url, per_page = config.per_page, "config loaded");

    let service: Arc<dyn NotesService> = if cli.offline {
        Arc::new(InMemoryNotesService::demo())
    } else {
        Arc::new(HttpNotesService::from_config(&config)?)
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    Ok(AppContext {
        api: NotesApi::new(service, config_dir.to_path_buf()),
        config,
        runtime,
        offline: cli.offline,
    })
}

fn handle_browse(ctx: &AppContext) -> Result<()> {
    let session = NotesSession::new(SessionOptions {
        debounce: ctx.config.debounce(),
        toast_ttl: ctx.config.toast_ttl(),
    });
    let mut app = App::new(session, ctx.api.service(), ctx.runtime.handle().clone())
        .with_offline(ctx.offline);
    tui::run(&mut app)
}

fn handle_list(ctx: &AppContext, search: Option<String>, page: u32) -> Result<()> {
    let result = ctx.runtime.block_on(ctx.api.list_notes(search, page))?;
    if let Some((params, page)) = &result.listed {
        print_notes(params, page);
    }
    print_messages(&result.messages);
    Ok(())
}

fn handle_create(ctx: &AppContext, title: String, content: String, tag: String) -> Result<()> {
    let result = ctx
        .runtime
        .block_on(ctx.api.create_note(title, content, &tag))?;
    print_messages(&result.messages);
    print_created(&result.created_notes);
    Ok(())
}

fn handle_config(ctx: &AppContext, key: Option<String>, value: Option<String>) -> Result<()> {
    let action = match (key, value) {
        (None, _) => ConfigAction::ShowAll,
        (Some(k), None) => ConfigAction::ShowKey(k),
        (Some(k), Some(v)) => ConfigAction::Set(k, v),
    };
    let show_all = matches!(action, ConfigAction::ShowAll);

    let result = ctx.api.config(action)?;
    if show_all {
        if let Some(config) = &result.config {
            print_config(config);
        }
    }
    print_messages(&result.messages);
    Ok(())
}
