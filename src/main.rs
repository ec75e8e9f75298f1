// src/main.rs

use file_picker_bridge::core::{ConfigManagerOperations, CoreConfigManager, PluginConfig};
use file_picker_bridge::{FilePickerPlugin, initialize_logging, native_dialog_for_current_platform};

use serde_json::Value;
use std::process::ExitCode;

const APP_NAME: &str = "FilePickerBridge";

/*
 * Developer harness: runs one method call against the native dialog of this
 * machine and prints the reply as JSON.
 *
 *     file_picker_bridge <method> [json-arguments]
 *
 * e.g. `file_picker_bridge IMAGE '{"allowMultipleSelection": true}'`.
 */
fn main() -> ExitCode {
    initialize_logging();

    let mut args = std::env::args().skip(1);
    let Some(method) = args.next() else {
        eprintln!("usage: file_picker_bridge <method> [json-arguments]");
        return ExitCode::from(2);
    };
    let arguments = match args.next() {
        Some(raw) => match serde_json::from_str::<Value>(&raw) {
            Ok(value) => value,
            Err(e) => {
                eprintln!("arguments are not valid JSON: {e}");
                return ExitCode::from(2);
            }
        },
        None => Value::Null,
    };

    let config_manager = CoreConfigManager::new();
    let config = config_manager.load_config(APP_NAME).unwrap_or_else(|e| {
        log::warn!("main: Could not load configuration ({e}), using defaults.");
        PluginConfig::default()
    });

    let native = native_dialog_for_current_platform(&config);
    let plugin = FilePickerPlugin::new(config, native);
    log::info!("main: Dispatching '{}' on channel '{}'", method, plugin.channel_name());

    match plugin.handle_value(&method, arguments) {
        Ok(reply) => {
            println!("{reply}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
    }
}
