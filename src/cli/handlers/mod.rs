use std::io::Write;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::config_io;
use crate::io::kv::DirStore;
use crate::io::recovery::{prune_recovery, read_recovery_entries, recovery_log_path};
use crate::model::project::{ProjectDraft, parse_tag_list};
use crate::model::theme::ThemePreference;
use crate::ops::image;
use crate::ops::query::Query;
use crate::ops::session::Session;
use crate::view::{self, html};

type CmdResult = Result<(), Box<dyn std::error::Error>>;

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let json = cli.json;
    let data_dir = config_io::resolve_data_dir(cli.data_dir.as_deref().map(Path::new));
    tracing::debug!(data_dir = %data_dir.display(), "resolved data directory");

    let cmd = match cli.command {
        None => return Ok(()),
        // Recovery reads the log directly and never touches the project list
        Some(Commands::Recovery(args)) => return cmd_recovery(&data_dir, args, json),
        Some(cmd) => cmd,
    };

    let mut session = open_session(&data_dir)?;
    match cmd {
        // Read commands
        Commands::List(args) => cmd_list(&session, args, json),
        Commands::Show(args) => cmd_show(&session, args, json),
        Commands::Tags => cmd_tags(&session, json),
        Commands::Export(args) => cmd_export(&session, args),
        Commands::Html(args) => cmd_html(&session, args),

        // Write commands
        Commands::Add(args) => cmd_add(&mut session, args, json),
        Commands::Edit(args) => cmd_edit(&mut session, args, json),
        Commands::Delete(args) => cmd_delete(&mut session, args),
        Commands::Star(args) => cmd_star(&mut session, args, json),
        Commands::Import(args) => cmd_import(&mut session, args, json),
        Commands::Reset(args) => cmd_reset(&mut session, args),
        Commands::Theme(args) => cmd_theme(&mut session, args),
        Commands::Recovery(_) => unreachable!("handled before the session opens"),
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub fn open_session(data_dir: &Path) -> Result<Session<DirStore>, Box<dyn std::error::Error>> {
    let config = config_io::read_config(data_dir)?;
    Ok(Session::open(DirStore::new(data_dir), config)?)
}

fn build_query(session: &Session<DirStore>, args: &QueryArgs) -> Query {
    let mut query = session.default_query();
    if let Some(text) = &args.search {
        query.text = text.clone();
    }
    query.tag = args.tag.clone();
    query.favorites_only = args.favorites;
    if let Some(sort) = args.sort {
        query.sort = sort;
    }
    query
}

fn confirm(prompt: &str) -> Result<bool, std::io::Error> {
    eprint!("{} [y/n] ", prompt);
    std::io::stderr().flush()?;
    let mut input = String::new();
    std::io::stdin().read_line(&mut input)?;
    Ok(input.trim().eq_ignore_ascii_case("y"))
}

fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_lines(lines: &[String]) {
    for line in lines {
        println!("{}", line);
    }
}

/// Write to `output`, or stdout when it is `-`. Returns the path written, if any.
fn write_output(output: &str, content: &str) -> Result<Option<PathBuf>, std::io::Error> {
    if output == "-" {
        print!("{}", content);
        if !content.ends_with('\n') {
            println!();
        }
        return Ok(None);
    }
    let path = PathBuf::from(output);
    std::fs::write(&path, content)?;
    Ok(Some(path))
}

// ---------------------------------------------------------------------------
// Read handlers
// ---------------------------------------------------------------------------

fn cmd_list(session: &Session<DirStore>, args: QueryArgs, json: bool) -> CmdResult {
    let query = build_query(session, &args);
    let results = session.query(&query);
    let grid = view::project_grid(&results, session.config().ui.excerpt_width);
    if json {
        let cards: Vec<_> = grid.cards.iter().map(card_to_json).collect();
        return print_json(&cards);
    }
    print_lines(&format_grid(&grid));
    Ok(())
}

fn cmd_show(session: &Session<DirStore>, args: ShowArgs, json: bool) -> CmdResult {
    let project = match &args.id {
        Some(id) => session
            .find(id)
            .ok_or_else(|| format!("project not found: {}", id))?,
        None => session.featured().ok_or("no projects")?,
    };
    if json {
        return print_json(project);
    }
    print_lines(&format_project_detail(project));
    Ok(())
}

fn cmd_tags(session: &Session<DirStore>, json: bool) -> CmdResult {
    let facets = session.tag_facets();
    if json {
        return print_json(&facets);
    }
    print_lines(&facets);
    Ok(())
}

fn cmd_export(session: &Session<DirStore>, args: ExportArgs) -> CmdResult {
    let text = session.export_json()?;
    if let Some(path) = write_output(&args.output, &text)? {
        eprintln!("exported {} projects to {}", session.projects().len(), path.display());
    }
    Ok(())
}

fn cmd_html(session: &Session<DirStore>, args: HtmlArgs) -> CmdResult {
    let query = build_query(session, &args.query);
    let results = session.query(&query);
    let grid = view::project_grid(&results, session.config().ui.excerpt_width);
    let page = html::render_page(&grid, session.featured(), session.theme()?);
    if let Some(path) = write_output(&args.output, &page)? {
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

fn cmd_recovery(data_dir: &Path, args: RecoveryArgs, json: bool) -> CmdResult {
    if let Some(RecoveryAction::Prune(prune)) = args.action {
        return cmd_recovery_prune(data_dir, prune);
    }
    if args.path {
        println!("{}", recovery_log_path(data_dir).display());
        return Ok(());
    }
    let entries = read_recovery_entries(data_dir, Some(args.limit));
    if json {
        let out: Vec<_> = entries.iter().map(recovery_to_json).collect();
        return print_json(&out);
    }
    if entries.is_empty() {
        println!("recovery log is empty");
        return Ok(());
    }
    for (i, entry) in entries.iter().enumerate() {
        if i > 0 {
            println!();
        }
        print_lines(&format_recovery_entry(entry));
    }
    Ok(())
}

fn cmd_recovery_prune(data_dir: &Path, args: RecoveryPruneArgs) -> CmdResult {
    let before = args
        .before
        .as_deref()
        .map(|s| {
            DateTime::parse_from_rfc3339(s)
                .map(|dt| dt.with_timezone(&Utc))
                .map_err(|e| format!("invalid timestamp '{}': {}", s, e))
        })
        .transpose()?;
    let removed = prune_recovery(data_dir, before, args.all)?;
    println!("pruned {} recovery entries", removed);
    Ok(())
}

// ---------------------------------------------------------------------------
// Write handlers
// ---------------------------------------------------------------------------

fn encode_image(path: &str) -> Result<String, image::ImageError> {
    image::encode_file(Path::new(path))
}

fn cmd_add(session: &mut Session<DirStore>, args: AddArgs, json: bool) -> CmdResult {
    let img = args.image.as_deref().map(encode_image).transpose()?;
    let draft = ProjectDraft {
        title: args.title,
        description: args.description,
        tags: args.tags.as_deref().map(parse_tag_list).unwrap_or_default(),
        github: args.github.unwrap_or_default(),
        demo: args.demo.unwrap_or_default(),
        img,
    };
    let project = session.add(draft)?;
    if json {
        return print_json(project);
    }
    println!("{}", project.id);
    Ok(())
}

fn cmd_edit(session: &mut Session<DirStore>, args: EditArgs, json: bool) -> CmdResult {
    let current = session
        .find(&args.id)
        .ok_or_else(|| format!("project not found: {}", args.id))?;
    let mut draft = ProjectDraft::from_project(current);
    if let Some(title) = args.title {
        draft.title = title;
    }
    if let Some(description) = args.description {
        draft.description = description;
    }
    if let Some(tags) = args.tags {
        draft.tags = parse_tag_list(&tags);
    }
    if let Some(github) = args.github {
        draft.github = github;
    }
    if let Some(demo) = args.demo {
        draft.demo = demo;
    }
    if args.clear_image {
        draft.img = None;
    } else if let Some(path) = &args.image {
        draft.img = Some(encode_image(path)?);
    }

    let project = session.edit(&args.id, draft)?;
    if json {
        return print_json(project);
    }
    print_lines(&format_project_detail(project));
    Ok(())
}

fn cmd_delete(session: &mut Session<DirStore>, args: ConfirmIdArgs) -> CmdResult {
    let title = session
        .find(&args.id)
        .map(|p| p.title.clone())
        .ok_or_else(|| format!("project not found: {}", args.id))?;
    if !args.yes && !confirm(&format!("Delete \"{}\"?", title))? {
        println!("cancelled");
        return Ok(());
    }
    let removed = session.delete(&args.id)?;
    println!("deleted {} ({})", args.id, removed.len());
    Ok(())
}

fn cmd_star(session: &mut Session<DirStore>, args: IdArg, json: bool) -> CmdResult {
    let starred = session.toggle_star(&args.id)?;
    if json {
        return print_json(&serde_json::json!({ "id": args.id, "starred": starred }));
    }
    println!("{} {}", if starred { "starred" } else { "unstarred" }, args.id);
    Ok(())
}

fn cmd_import(session: &mut Session<DirStore>, args: ImportArgs, json: bool) -> CmdResult {
    let text = std::fs::read_to_string(&args.file)
        .map_err(|e| format!("could not read {}: {}", args.file, e))?;
    let report = session.import_json(&text)?;
    if json {
        return print_json(&ImportJson {
            imported: report.imported,
            skipped: report.skipped,
            replaced: report.replaced,
        });
    }
    println!("imported {} projects", report.imported);
    if report.skipped > 0 {
        println!("  {} skipped (duplicate id)", report.skipped);
    }
    if report.replaced > 0 {
        println!("  {} replaced", report.replaced);
    }
    Ok(())
}

fn cmd_reset(session: &mut Session<DirStore>, args: YesArg) -> CmdResult {
    if !args.yes && !confirm("Reset to the sample projects? Current projects are discarded.")? {
        println!("cancelled");
        return Ok(());
    }
    session.reset()?;
    println!("reset to {} sample projects", session.projects().len());
    Ok(())
}

fn cmd_theme(session: &mut Session<DirStore>, args: ThemeArgs) -> CmdResult {
    let current = session.theme()?;
    let next = match args.value.as_deref() {
        None => {
            println!("{}", current);
            return Ok(());
        }
        Some("toggle") => current.toggled(),
        Some(s) => ThemePreference::parse(s)
            .ok_or_else(|| format!("unknown theme: {} (expected light, dark or toggle)", s))?,
    };
    session.set_theme(next)?;
    println!("{}", next);
    Ok(())
}
