use clap::Parser;
use std::io::Write;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::io::{AsyncBufReadExt, BufReader};

use people_pets_api::datalayer::CRUD::types::{Person, Pet};
use people_pets_api::editor::{
    EditorApi, EditorController, EditorRecord, HttpEditorApi, RowKey,
};
use people_pets_api::logging::{TelemetryConfig, init_telemetry};

/// Terminal editor for the people and pets registry
#[derive(Debug, Parser)]
#[command(name = "people-pets-admin", version, about)]
struct Cli {
    /// Base URL of the registry API
    #[arg(long, env = "PEOPLE_PETS_URL", default_value = "http://localhost:3000")]
    url: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Tab {
    People,
    Pets,
}

const HELP: &str = "\
commands:
  tab [people|pets]     switch editor (toggles without an argument)
  list                  reload the table
  select <id>           open a record in the form
  key <row> <key>       press a key on a table row (1-based); space and enter select
  new                   open an empty form
  set <field> <value>   edit a form field
  submit                create or update from the form
  delete                delete the open record
  close                 clear and hide the form
  help                  show this text
  quit                  exit";

struct Admin {
    tab: Tab,
    people: EditorController<Person>,
    pets: EditorController<Pet>,
    dirty: Arc<AtomicBool>,
}

impl Admin {
    fn new(api: Arc<dyn EditorApi>) -> Self {
        let dirty = Arc::new(AtomicBool::new(true));
        let mut people = EditorController::new(Arc::clone(&api));
        let mut pets = EditorController::new(api);

        let flag = Arc::clone(&dirty);
        people.subscribe(move |_, _| flag.store(true, Ordering::Relaxed));
        let flag = Arc::clone(&dirty);
        pets.subscribe(move |_, _| flag.store(true, Ordering::Relaxed));

        Self {
            tab: Tab::People,
            people,
            pets,
            dirty,
        }
    }

    async fn refresh_all(&mut self) {
        // Failures land in each editor's error panel
        let _ = self.people.refresh_list().await;
        let _ = self.pets.refresh_list().await;
    }

    fn switch(&mut self, arg: Option<&str>) -> Result<(), String> {
        self.tab = match (arg, self.tab) {
            (Some("people"), _) | (None, Tab::Pets) => Tab::People,
            (Some("pets"), _) | (None, Tab::People) => Tab::Pets,
            (Some(other), _) => return Err(format!("unknown tab '{}'", other)),
        };
        self.dirty.store(true, Ordering::Relaxed);
        Ok(())
    }

    fn render_if_dirty(&self) {
        if !self.dirty.swap(false, Ordering::Relaxed) {
            return;
        }
        match self.tab {
            Tab::People => render(&self.people, self.tab),
            Tab::Pets => render(&self.pets, self.tab),
        }
    }
}

async fn run_command<R: EditorRecord>(
    editor: &mut EditorController<R>,
    command: &str,
    args: &[&str],
) -> Result<(), String> {
    // API failures are reported through the editor's error panel
    match command {
        "list" => {
            let _ = editor.refresh_list().await;
            Ok(())
        }
        "select" => {
            let id = args
                .first()
                .and_then(|raw| raw.parse::<i64>().ok())
                .ok_or("usage: select <id>")?;
            if editor.select_by_id(id) {
                Ok(())
            } else {
                Err(format!("no row with id {}", id))
            }
        }
        "key" => {
            let (Some(row), Some(key)) = (args.first(), args.get(1)) else {
                return Err("usage: key <row> <key>".to_string());
            };
            let row = row
                .parse::<usize>()
                .ok()
                .and_then(|r| r.checked_sub(1))
                .ok_or("row must be a positive number")?;
            editor.handle_key(row, RowKey::parse(key));
            Ok(())
        }
        "new" => {
            editor.begin_create();
            Ok(())
        }
        "set" => {
            let Some(field) = args.first() else {
                return Err("usage: set <field> <value>".to_string());
            };
            let value = args[1..].join(" ");
            if editor.set_field(field, value) {
                Ok(())
            } else {
                Err(format!("field '{}' cannot be edited now", field))
            }
        }
        "submit" => {
            let _ = editor.submit().await;
            Ok(())
        }
        "delete" => {
            let _ = editor.delete_selected().await;
            Ok(())
        }
        "close" => {
            editor.close();
            Ok(())
        }
        other => Err(format!("unknown command '{}', try 'help'", other)),
    }
}

fn render<R: EditorRecord>(editor: &EditorController<R>, tab: Tab) {
    let state = editor.state();
    let marker = |t: Tab| if t == tab { "*" } else { " " };

    println!();
    println!(
        "[{}People] [{}Pets]{}",
        marker(Tab::People),
        marker(Tab::Pets),
        if state.is_loading { "  loading..." } else { "" }
    );

    let mut header = format!("{:>4}  {:>5}", "row", "id");
    for field in R::FIELDS {
        header.push_str(&format!("  {:<18}", field.label));
    }
    println!("{}", header);
    for (row, item) in state.items.iter().enumerate() {
        let selected = state
            .selected_item
            .as_ref()
            .is_some_and(|s| s.id() == item.id());
        let mut line = format!(
            "{}{:>3}  {:>5}",
            if selected { ">" } else { " " },
            row + 1,
            item.id()
        );
        for field in R::FIELDS {
            line.push_str(&format!(
                "  {:<18}",
                item.field_value(field.name).unwrap_or_default()
            ));
        }
        println!("{}", line);
    }
    if state.items.is_empty() {
        println!("  (no {})", R::TITLE.to_lowercase());
    }

    if state.form_visible {
        let title = match &state.selected_item {
            Some(item) => format!("Edit #{}", item.id()),
            None => "New record".to_string(),
        };
        println!("-- {} --", title);
        for field in R::FIELDS {
            println!(
                "  {:<10} {}{}",
                field.name,
                state.form_value(field.name).unwrap_or_default(),
                if state.is_field_disabled(field) { "  (locked)" } else { "" }
            );
        }
        println!(
            "  submit{}  close",
            if state.delete_visible() { "  delete" } else { "" }
        );
    }

    if let Some(error) = &state.error {
        println!("!! {}", error);
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    init_telemetry(
        TelemetryConfig::new()
            .with_service_name("people-pets-admin")
            .with_log_level("warn"),
    )?;

    let api: Arc<dyn EditorApi> = Arc::new(HttpEditorApi::new(cli.url.as_str()));
    let mut admin = Admin::new(api);
    println!("Connected to {} - type 'help' for commands", cli.url);

    admin.refresh_all().await;
    admin.render_if_dirty();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        print!("{}> ", if admin.tab == Tab::People { "people" } else { "pets" });
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let words: Vec<&str> = line.split_whitespace().collect();
        let Some((&command, args)) = words.split_first() else {
            continue;
        };

        let outcome = match command {
            "quit" | "exit" => break,
            "help" => {
                println!("{}", HELP);
                Ok(())
            }
            "tab" => admin.switch(args.first().copied()),
            _ => match admin.tab {
                Tab::People => run_command(&mut admin.people, command, args).await,
                Tab::Pets => run_command(&mut admin.pets, command, args).await,
            },
        };

        if let Err(message) = outcome {
            println!("{}", message);
        }
        admin.render_if_dirty();
    }

    people_pets_api::logging::shutdown_telemetry();
    Ok(())
}
