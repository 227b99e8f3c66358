// crates/coverpick-ui/src/modules/mod.rs
//
// Module registry. To add a new panel:
//   1. Create modules/mypanel.rs implementing SelectorModule
//   2. Add `pub mod mypanel;` below
//   3. Give it a panel in app::update

pub mod filmstrip;
pub mod player;

use coverpick_core::commands::SelectorCommand;
use coverpick_core::session::SessionState;
use crate::context::AppContext;
use egui::Ui;

/// Every panel implements this trait.
/// Modules read state and the context's textures, and emit commands; they
/// never mutate state directly, and only app.rs talks to the worker.
pub trait SelectorModule {
    fn name(&self) -> &str;
    fn ui(
        &mut self,
        ui:    &mut Ui,
        state: &SessionState,
        actx:  &mut AppContext,
        cmd:   &mut Vec<SelectorCommand>,
    );
}
