use anyhow::Context as _;
use dashboard_frontend::{console_log, DashboardFrontend, DashboardFrontendProps};
use dashboard_shared::DashboardConfig;

/// The `#app` element the dashboard mounts into and reads its settings from.
fn mount_point() -> anyhow::Result<web_sys::Element> {
    let window = web_sys::window().context("no global `window` exists")?;
    let document = window.document().context("window has no document")?;
    document
        .get_element_by_id("app")
        .context("missing #app mount element")
}

fn main() {
    let app = match mount_point() {
        Ok(app) => app,
        Err(e) => {
            console_log::init(DashboardConfig::default().log_level);
            log::error!("Cannot start dashboard: {e:#}");
            return;
        }
    };

    let (config, problems) =
        DashboardConfig::from_attributes(|key| app.get_attribute(&format!("data-{key}")));
    console_log::init(config.log_level);
    for problem in &problems {
        log::warn!("Ignoring dashboard setting: {problem}");
    }

    let props = DashboardFrontendProps { config };
    yew::Renderer::<DashboardFrontend>::with_root_and_props(app, props).render();
}
