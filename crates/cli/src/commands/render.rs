use eyre::WrapErr;
use lesspress_config::Config;
use lesspress_hooks::{Application, LessPlugin, MessageLevel, RenderContext};
use std::path::Path;

const EMPTY_PAGE: &str = "<!DOCTYPE html>\n<html>\n<head>\n</head>\n<body>\n</body>\n</html>\n";

/// Run both hooks around a page body the way a real render would, then print
/// the body. Queued messages go to stderr; any error message fails the
/// command after the body is printed.
pub fn execute(config: &Config, template: &str, admin: bool, body: Option<&Path>) -> eyre::Result<()> {
    let plugin = LessPlugin::from_config(config);

    let mut ctx = RenderContext::site(template);
    if admin {
        ctx.application = Application::Administrator;
    }

    plugin.on_before_render(&mut ctx);

    ctx.body = match body {
        Some(path) => std::fs::read_to_string(path)
            .wrap_err_with(|| format!("Failed to read page body {}", path.display()))?,
        None => EMPTY_PAGE.to_string(),
    };
    ctx.inject_head();

    plugin.on_after_render(&mut ctx);

    print!("{}", ctx.body);

    let mut errors = 0;
    for message in ctx.messages.iter() {
        eprintln!("[{}] {}", message.level, message.text);
        if message.level == MessageLevel::Error {
            errors += 1;
        }
    }
    if errors > 0 {
        eyre::bail!("stylesheet build for '{template}' failed");
    }
    Ok(())
}
