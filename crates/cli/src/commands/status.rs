use chrono::{DateTime, Local};
use lesspress_config::Config;
use lesspress_core::ArtifactKind;
use lesspress_hooks::LessPlugin;
use lesspress_utils::probe_file;

fn local_time(epoch: i64) -> String {
    DateTime::from_timestamp(epoch, 0)
        .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| epoch.to_string())
}

pub fn execute(config: &Config, template: &str) -> eyre::Result<()> {
    let plugin = LessPlugin::from_config(config);
    let build = plugin.config();
    let layout = plugin.site().template(template);

    println!("Template:    {template}");
    println!(
        "Configured:  {}",
        if build.active_template(Some(template)).is_some() {
            "yes"
        } else {
            "no"
        }
    );
    println!("Mode:        {}", build.compile_mode);
    println!("Source:      {}", layout.less_file().display());

    let verdict = plugin.status(template)?;
    println!(
        "State:       {}",
        if verdict.is_stale() {
            format!("stale ({verdict})")
        } else {
            verdict.to_string()
        }
    );

    match plugin.snapshot()? {
        Some(snapshot) => {
            println!("Tracked files ({}):", snapshot.len());
            for (path, record) in snapshot.iter() {
                println!(
                    "  {} ({} bytes, modified {})",
                    path.display(),
                    record.filesize_bytes,
                    local_time(record.modified_at_epoch)
                );
            }
        }
        None => println!("Tracked files: none"),
    }

    println!("Artifacts:");
    for kind in [
        ArtifactKind::CompressedCss,
        ArtifactKind::UncompressedCss,
        ArtifactKind::SourceMap,
    ] {
        let path = layout.artifact(kind);
        let label = kind.to_string();
        match probe_file(&path) {
            Some(stat) => {
                println!(
                    "  {label:<16} {} bytes, modified {}",
                    stat.size,
                    local_time(stat.modified)
                );
            }
            None => println!("  {label:<16} missing"),
        }
    }
    Ok(())
}
