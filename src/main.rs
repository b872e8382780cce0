use anyhow::Result;
use clap::Parser;

use dockyard::cli::CliArgs;
use dockyard::config::RuntimeConfig;
use dockyard::config_paths;
use dockyard::layout::LayoutStore;
use dockyard::plugin::{activation_order, PluginDescriptor};
use dockyard::plugins::builtin_descriptors;
use dockyard::shortcuts::ShortcutMap;
use dockyard::HostWindow;

fn main() -> Result<()> {
    dockyard::tracing::init();

    let startup = match CliArgs::parse().into_config() {
        Ok(startup) => startup,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(2);
        }
    };

    let descriptors = builtin_descriptors(startup.builtin_options());

    if startup.list_plugins {
        return list_plugins(&descriptors);
    }

    let mut config = RuntimeConfig::load();
    startup.apply_to(&mut config);

    let shortcuts = ShortcutMap::load(config_paths::shortcuts_file().as_deref());
    let mut host = HostWindow::new(config).with_shortcuts(shortcuts);
    if let Some(store) = LayoutStore::default_location() {
        host = host.with_store(store);
    }

    for descriptor in descriptors {
        if let Err(e) = host.register(descriptor) {
            fatal(&e);
        }
    }
    if let Err(e) = host.start() {
        fatal(&e);
    }

    host.finish_tasks();
    print_session(&host);

    host.shutdown(true);
    Ok(())
}

fn list_plugins(descriptors: &[PluginDescriptor]) -> Result<()> {
    match activation_order(descriptors) {
        Ok(order) => {
            for (i, id) in order.iter().enumerate() {
                println!("{:>2}. {}", i + 1, id);
            }
            Ok(())
        }
        Err(e) => fatal(&e),
    }
}

fn print_session(host: &HostWindow) {
    for id in host.plugins.ready_plugins() {
        let placement = match host.frame.placement(&id) {
            Some(placement) => format!("{:?}", placement.area),
            None if host.frame.is_floating(&id) => "floating".to_string(),
            None => "-".to_string(),
        };
        let state = if host.frame.is_visible(&id) {
            "visible"
        } else {
            "hidden"
        };
        println!("{:<20} {:<8} {}", id.as_str(), placement, state);
    }
    if let Some(status) = host.frame.status() {
        println!("{}", status.text);
    }
}

fn fatal(error: &dockyard::RuntimeError) -> ! {
    tracing::error!("Startup failed: {}", error);
    eprintln!("Error: {}", error);
    std::process::exit(1);
}
