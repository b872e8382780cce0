//! Benchmarks for plugin startup, message dispatch and layout persistence
//!
//! Run with: cargo bench startup

use dockyard::config::RuntimeConfig;
use dockyard::layout::Preset;
use dockyard::messages::{LayoutMsg, Msg, PaneMsg};
use dockyard::plugin::{activation_order, Plugin, PluginDescriptor, PluginId};
use dockyard::plugins::{builtin_descriptors, ids, BuiltinOptions};
use dockyard::HostWindow;

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

struct Blank(String);

impl Plugin for Blank {
    fn title(&self) -> String {
        self.0.clone()
    }
}

/// `count` plugins, each requiring the one before it and optionally the
/// one two back
fn chain(count: usize) -> Vec<PluginDescriptor> {
    (0..count)
        .map(|i| {
            let name = format!("p{:04}", i);
            let title = name.clone();
            let mut descriptor = PluginDescriptor::new(name, move || Ok(Blank(title.clone())));
            if i > 0 {
                descriptor = descriptor.requires([PluginId::from(format!("p{:04}", i - 1))]);
            }
            if i > 1 {
                descriptor = descriptor.optional([PluginId::from(format!("p{:04}", i - 2))]);
            }
            descriptor
        })
        .collect()
}

fn builtin_host() -> HostWindow {
    let mut host = HostWindow::new(RuntimeConfig::default());
    let options = BuiltinOptions {
        explorer_root: Some(std::env::temp_dir()),
        ..BuiltinOptions::default()
    };
    for descriptor in builtin_descriptors(options) {
        if let Err(e) = host.register(descriptor) {
            panic!("register failed: {}", e);
        }
    }
    if let Err(e) = host.start() {
        panic!("start failed: {}", e);
    }
    host.finish_tasks();
    host
}

// ============================================================================
// Startup
// ============================================================================

#[divan::bench(args = [10, 100, 500])]
fn order_chain(bencher: divan::Bencher, count: usize) {
    let descriptors = chain(count);
    bencher.bench_local(|| divan::black_box(activation_order(&descriptors)));
}

#[divan::bench(args = [10, 100])]
fn start_chain(bencher: divan::Bencher, count: usize) {
    bencher
        .with_inputs(|| {
            let mut host = HostWindow::new(RuntimeConfig::default());
            for descriptor in chain(count) {
                let _ = host.register(descriptor);
            }
            host
        })
        .bench_local_values(|mut host| {
            let _ = host.start();
            host
        });
}

#[divan::bench]
fn start_builtins() -> HostWindow {
    builtin_host()
}

// ============================================================================
// Dispatch
// ============================================================================

#[divan::bench(args = [100, 1000])]
fn toggle_help(iterations: usize) {
    let mut host = builtin_host();
    let help = PluginId::from(ids::HELP);

    for i in 0..iterations {
        let cmd = host.dispatch(Msg::Pane(PaneMsg::ToggleView {
            plugin: help.clone(),
            visible: i % 2 == 1,
        }));
        divan::black_box(cmd);
    }
}

#[divan::bench(args = [10, 100])]
fn apply_presets(iterations: usize) {
    let mut host = builtin_host();

    for i in 0..iterations {
        let preset = Preset::ALL[i % Preset::ALL.len()];
        let cmd = host.dispatch(Msg::Layout(LayoutMsg::ApplyPreset(preset.key().to_string())));
        divan::black_box(cmd);
    }
}

// ============================================================================
// Layout persistence
// ============================================================================

#[divan::bench]
fn save_layout(bencher: divan::Bencher) {
    let host = builtin_host();
    bencher.bench_local(|| divan::black_box(host.layout.save(&host.frame)));
}

#[divan::bench]
fn serialize_layout_file(bencher: divan::Bencher) {
    let host = builtin_host();
    let file = host.layout.to_file(&host.frame);
    bencher.bench_local(|| divan::black_box(serde_json::to_string(&file)));
}
