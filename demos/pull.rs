//! Example: Download a single file out of a running container
//!
//! Usage:
//!   cargo run --example pull -- --url http://localhost:3618 --token TOKEN \
//!       --namespace default --pod web-0 --container nginx \
//!       --path /etc/nginx/nginx.conf [--out nginx.conf]

use podbrowse::{ApiClient, ContainerContext, ExplorerHandle, FileEntry};
use std::env;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args: Vec<String> = env::args().collect();

    let mut url = None;
    let mut token = None;
    let mut namespace = None;
    let mut pod = None;
    let mut container = None;
    let mut path = None;
    let mut out = None;

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
            "--path" => {
                path = args.get(i + 1).cloned();
                i += 2;
            }
            "--out" | "-o" => {
                out = args.get(i + 1).cloned();
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
    let path = path.expect("--path is required");

    let api = ApiClient::new(&url).with_token(&token);
    let explorer = ExplorerHandle::new(api);

    let ctx = ContainerContext::new(&pod, &namespace, &container);
    explorer.switch_context(ctx).await?;

    // Select the file by path; the name is the last path segment.
    let name = path.rsplit('/').next().unwrap_or(&path);
    explorer
        .select(FileEntry::new(name, path.as_str(), false))
        .await?;

    println!("Downloading {}...", path);
    let download = explorer.download_selected().await?;

    let output_path = out.unwrap_or(download.file_name);
    std::fs::write(&output_path, &download.bytes)?;

    println!("✅ Saved {} ({} bytes)", output_path, download.bytes.len());

    explorer.shutdown().await;
    Ok(())
}
