use roster_business::{ApiState, BusinessConfig, roster_ctx};
use roster_states::StateCtx;

use crate::widgets::RosterPageUi;

/// The main application state.
pub struct State {
    /// The state context for business logic.
    pub ctx: StateCtx,
    /// Text buffers and toggles that only the widgets care about.
    pub page_ui: RosterPageUi,
}

impl Default for State {
    fn default() -> Self {
        Self::new(BusinessConfig::default())
    }
}

impl State {
    pub fn new(config: BusinessConfig) -> Self {
        let api = ApiState::http(&config);
        Self {
            ctx: roster_ctx(config, api),
            page_ui: RosterPageUi::default(),
        }
    }

    /// State pointed at a mock server, for institute `inst-1`.
    pub fn test(base_url: String) -> Self {
        Self::new(BusinessConfig::new(base_url).with_institute("inst-1"))
    }

    /// Throws away every page state and starts over with the same config
    /// and client.
    pub fn reload(&mut self) {
        let config = self.ctx.state::<BusinessConfig>().clone();
        let api = self.ctx.state::<ApiState>().clone();
        log::info!("State: reloading roster page");
        self.ctx = roster_ctx(config, api);
        self.page_ui = RosterPageUi::default();
    }
}
