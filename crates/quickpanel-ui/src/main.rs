//! Quick panel demo - drives the headless view from stdin.
//!
//! Each line is a command acting on an in-memory text surface:
//!
//! ```text
//! type <text>        insert text at the caret ("/" or "@" opens a panel)
//! bs                 backspace
//! key <keystroke>    press and release, e.g. "down", "mod+enter", "shift+enter"
//! hold <keystroke>   press without releasing
//! release            release all modifiers
//! compose <text>     insert text as an IME composition
//! commit             end the composition
//! move | hover <n> | click <n> | outside
//! quit
//! ```
//!
//! Usage: `quickpanel [items.json]`. The optional file holds the "/" panel
//! items as a JSON array.

use std::io::BufRead;
use std::path::Path;
use std::sync::Arc;

use quickpanel_core::{ListItem, PanelOptions, PanelSettings, TriggerInfo};
use quickpanel_store::PanelStore;
use quickpanel_ui::{
    parse_keystroke, primary_modifier, ClickTarget, KeyEvent, MemorySurface, Modifiers,
    PanelEvent, PanelFrame, QuickPanelView, Suffix,
};

// =============================================================================
// Demo Panels
// =============================================================================

fn load_items(path: &Path) -> Result<Vec<ListItem>, String> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;
    let mut items: Vec<ListItem> = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;
    for item in &mut items {
        if item.id.as_ref().is_empty() {
            item.id = Default::default();
        }
    }
    Ok(items)
}

fn default_commands() -> Vec<ListItem> {
    vec![
        ListItem::new("Translate").description("Translate the input"),
        ListItem::new("Summarize").description("Summarize the conversation"),
        ListItem::new("Knowledge Base").menu(),
        ListItem::new("Web Search").filter_text("internet"),
        ListItem::new("Clear").always_visible(),
    ]
}

fn model_panel(store: &Arc<PanelStore>, trigger: TriggerInfo) -> PanelOptions {
    let weak = Arc::downgrade(store);
    let models = ["Claude", "GPT-4o", "Gemini", "Qwen", "DeepSeek", "Llama", "Mistral", "Grok"];
    PanelOptions::new(
        "@",
        models
            .iter()
            .map(|name| ListItem::new(*name).description("model"))
            .collect(),
    )
    .title("Mention models")
    .multiple(true)
    .multiple_repeat(true)
    .trigger_info(trigger)
    .after_action(move |opts| {
        let Some(store) = weak.upgrade() else {
            return;
        };
        let mode = opts.mode;
        store.update_item(&opts.item.id, |mut item| {
            item.apply_selection(mode);
            item
        });
    })
    .on_close(|opts| tracing::info!("Mention panel closed ({:?})", opts.action))
}

fn command_panel(
    store: &Arc<PanelStore>,
    items: &[ListItem],
    trigger: TriggerInfo,
) -> PanelOptions {
    let weak = Arc::downgrade(store);
    let items = items
        .iter()
        .cloned()
        .map(|item| {
            if !item.is_menu {
                return item;
            }
            let weak = weak.clone();
            let trigger = trigger.clone();
            item.with_action(move |_| {
                if let Some(store) = weak.upgrade() {
                    store.open(
                        PanelOptions::new(
                            "/kb",
                            vec![ListItem::new("Manuals"), ListItem::new("Notes")],
                        )
                        .title("Knowledge bases")
                        .trigger_info(trigger.clone()),
                    );
                }
            })
        })
        .collect();

    PanelOptions::new("/", items)
        .title("Commands")
        .trigger_info(trigger)
        .on_close(|opts| tracing::info!("Command panel closed ({:?})", opts.action))
}

// =============================================================================
// Rendering
// =============================================================================

fn print_frame(view: &mut QuickPanelView<MemorySurface>) {
    let frame: PanelFrame = view.frame(640.0);
    let surface = view.surface();
    let (text, caret) = (surface.as_str(), surface.caret_position());
    let split = text
        .char_indices()
        .nth(caret)
        .map_or(text.len(), |(i, _)| i);
    println!("text: {}|{}", &text[..split], &text[split..]);

    if !frame.visible {
        println!("(panel hidden)");
        return;
    }
    if frame.collapsed {
        println!("(no matches)");
    }
    for row in &frame.rows {
        let marker = if row.focused { ">" } else { " " };
        let suffix = match &row.suffix {
            Suffix::None => String::new(),
            suffix => format!("  {}", suffix.text().unwrap_or_default()),
        };
        let description = row
            .description
            .as_deref()
            .map(|d| format!("  ({})", d))
            .unwrap_or_default();
        println!("{} {}{}{}", marker, row.label, description, suffix);
    }
    println!("-- {} | {}", frame.footer.title, frame.footer.hint_line());
}

// =============================================================================
// Main
// =============================================================================

fn main() {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    // The deferred clear runs on this runtime
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(1)
        .enable_time()
        .build()
        .expect("Failed to create tokio runtime");
    let _guard = rt.enter();

    let settings = match PanelSettings::load() {
        Ok(settings) => settings,
        Err(e) => {
            tracing::warn!("Using default settings: {}", e);
            PanelSettings::default()
        }
    };

    let commands = match std::env::args().nth(1) {
        Some(path) => match load_items(Path::new(&path)) {
            Ok(items) => items,
            Err(e) => {
                tracing::error!("{}", e);
                eprintln!("Error: {}", e);
                std::process::exit(1);
            }
        },
        None => default_commands(),
    };

    let primary = primary_modifier(settings.primary_modifier);
    let store = Arc::new(PanelStore::with_clear_delay(settings.clear_delay()));
    let mut view = match QuickPanelView::new(&store, MemorySurface::new(), settings) {
        Ok(view) => view,
        Err(e) => {
            tracing::error!("Failed to bind view: {}", e);
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    tracing::info!("Quick panel demo ready");

    let stdin = std::io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(line) => line,
            Err(e) => {
                tracing::error!("Failed to read stdin: {}", e);
                break;
            }
        };
        let (command, arg) = line.trim().split_once(' ').unwrap_or((line.trim(), ""));

        match command {
            "" => {}
            "quit" | "exit" => break,
            "type" => {
                view.surface_mut().type_str(arg);
                let last = arg.chars().last();
                if !store.is_visible() {
                    let caret = view.surface().caret_position();
                    let trigger = TriggerInfo::input(caret, view.surface().as_str());
                    match last {
                        Some('@') => store.open(model_panel(&store, trigger)),
                        Some('/') => store.open(command_panel(&store, &commands, trigger)),
                        _ => {}
                    }
                }
                view.handle_event(PanelEvent::TextChanged);
            }
            "bs" => {
                view.surface_mut().backspace();
                view.handle_event(PanelEvent::TextChanged);
            }
            "key" | "hold" => match parse_keystroke(arg, primary) {
                Ok(event) => {
                    let handled = view.handle_event(PanelEvent::KeyDown(event.clone()));
                    if command == "key" {
                        view.handle_event(PanelEvent::KeyUp(KeyEvent::new(
                            event.key,
                            Modifiers::empty(),
                        )));
                    }
                    tracing::debug!("Key handled by panel: {}", handled);
                }
                Err(e) => eprintln!("{}", e),
            },
            "release" => {
                view.handle_event(PanelEvent::KeyUp(KeyEvent::plain(
                    quickpanel_ui::Key::Other("modifiers".to_string()),
                )));
            }
            "compose" => {
                view.handle_event(PanelEvent::CompositionUpdate);
                view.surface_mut().type_str(arg);
                view.handle_event(PanelEvent::TextChanged);
            }
            "commit" => {
                view.handle_event(PanelEvent::CompositionEnd);
            }
            "move" => {
                view.handle_event(PanelEvent::PointerMoved);
            }
            "hover" | "click" => match arg.parse::<usize>() {
                Ok(index) if command == "hover" => {
                    view.handle_event(PanelEvent::RowHovered(index));
                }
                Ok(index) => {
                    view.handle_event(PanelEvent::RowClicked {
                        index,
                        modifiers: Modifiers::empty(),
                    });
                }
                Err(_) => eprintln!("Expected a row index, got '{}'", arg),
            },
            "outside" => {
                view.handle_event(PanelEvent::Clicked(ClickTarget::Outside));
            }
            other => {
                eprintln!("Unknown command '{}'", other);
                continue;
            }
        }

        view.run_deferred();
        print_frame(&mut view);
    }

    tracing::info!("Quick panel demo exiting");
}
