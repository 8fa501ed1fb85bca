use super::ui;
use crate::controller::FormController;
use tracing::debug;

/// Loads the sources behind a spinner.
pub async fn load(controller: &mut FormController) {
    let spinner = ui::new_spinner("Loading accounts and exchange rates...");
    controller.initialize().await;
    spinner.finish_and_clear();
}

/// Fills in the form, submits it and returns the rendered outcome.
pub async fn simulate(
    controller: &mut FormController,
    from: &str,
    to: &str,
    amount: &str,
) -> String {
    load(controller).await;
    if controller.state().error.is_some() {
        return ui::render_sources(controller.state());
    }

    controller.set_from_account(from);
    controller.set_to_account(to);
    controller.set_amount(amount);
    controller.submit();
    debug!(evaluations = controller.evaluations(), "Simulation submitted");
    ui::render_state(controller.state())
}

/// Lists what the sources returned.
pub async fn accounts(controller: &mut FormController) -> String {
    load(controller).await;
    ui::render_sources(controller.state())
}
