//! Example: Browse the filesystem of a running container
//!
//! Usage:
//!   cargo run --example browse -- --url http://localhost:3618 --token TOKEN \
//!       --namespace default --pod web-0 --container nginx [--expand /etc]

use podbrowse::{ApiClient, ContainerContext, ExplorerHandle, FileEntry, MergeOutcome};
use std::env;

#[tokio::main]
async fn main() {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    // Parse arguments
    let mut url = None;
    let mut token = None;
    let mut namespace = None;
    let mut pod = None;
    let mut container = None;
    let mut expand = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--url" | "-u" => {
                url = args.get(i + 1).cloned();
                i += 2;
            }
            "--token" | "-t" => {
                token = args.get(i + 1).cloned();
                i += 2;
            }
            "--namespace" | "-n" => {
                namespace = args.get(i + 1).cloned();
                i += 2;
            }
            "--pod" | "-p" => {
                pod = args.get(i + 1).cloned();
                i += 2;
            }
            "--container" | "-c" => {
                container = args.get(i + 1).cloned();
                i += 2;
            }
            "--expand" => {
                expand = args.get(i + 1).cloned();
                i += 2;
            }
            _ => {
                i += 1;
            }
        }
    }

    let url = url.expect("--url is required");
    let token = token.expect("--token is required");
    let namespace = namespace.expect("--namespace is required");
    let pod = pod.expect("--pod is required");
    let container = container.expect("--container is required");

    let api = ApiClient::new(&url).with_token(&token);
    let explorer = ExplorerHandle::new(api);

    let ctx = ContainerContext::new(&pod, &namespace, &container);
    println!("Loading / of {}...", ctx);
    match explorer.switch_context(ctx).await {
        Ok(MergeOutcome::FailedEmpty) => {
            eprintln!("⚠️  Root listing failed, showing an empty tree");
        }
        Ok(_) => {}
        Err(e) => {
            eprintln!("❌ Failed to switch context: {}", e);
            std::process::exit(1);
        }
    }

    if let Some(path) = &expand {
        match explorer.expand(path).await {
            Ok(MergeOutcome::FailedEmpty) => {
                eprintln!("⚠️  Listing {} failed, showing it empty", path);
            }
            Ok(_) => {}
            Err(e) => {
                eprintln!("❌ Failed to expand {}: {}", path, e);
            }
        }
    }

    let tree = explorer.tree().await.expect("Explorer stopped");
    if tree.is_empty() {
        println!("  (empty)");
    } else {
        for entry in tree.roots() {
            print_entry(entry, 1);
        }
    }

    explorer.shutdown().await;
}

fn print_entry(entry: &FileEntry, depth: usize) {
    let type_icon = if entry.is_dir { "📁" } else { "📄" };
    let size_str = if entry.is_file() {
        format_size(entry.size)
    } else {
        String::new()
    };
    println!(
        "{}{} {} {}",
        "  ".repeat(depth),
        type_icon,
        entry.name,
        size_str
    );
    if let Some(children) = &entry.children {
        if children.is_empty() {
            println!("{}(empty)", "  ".repeat(depth + 1));
        }
        for child in children {
            print_entry(child, depth + 1);
        }
    }
}

fn format_size(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{}B", bytes)
    } else if bytes < 1_048_576 {
        format!("{:.1}KB", bytes as f64 / 1024.0)
    } else if bytes < 1_073_741_824 {
        format!("{:.1}MB", bytes as f64 / 1_048_576.0)
    } else {
        format!("{:.2}GB", bytes as f64 / 1_073_741_824.0)
    }
}
