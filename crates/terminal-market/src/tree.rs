//! Menu tree wiring
//!
//! The whole tree is constructed here, once, at startup. Any registration
//! conflict (duplicate command, reserved word, duplicate flag) fails the
//! build before the first prompt is ever shown.

use crate::menus::{ca, crypto, enter_spec, fa, stocks, ta};
use crate::provider::MarketDataProvider;
use std::sync::Arc;
use terminal_engine::{CommandRegistry, MenuTree, Result as EngineResult};
use tracing::debug;

/// Build the full market menu tree over one shared provider
pub fn build_menu_tree(provider: Arc<dyn MarketDataProvider>) -> EngineResult<MenuTree> {
    let mut root = CommandRegistry::new();
    root.register(stocks::load_spec(provider.clone())?)?;
    root.register(stocks::view_spec(provider.clone())?)?;
    root.register(stocks::status_spec()?)?;
    root.register(stocks::reset_spec()?)?;
    root.register(enter_spec("ta", "Technical analysis menu")?)?;
    root.register(enter_spec("fa", "Fundamental analysis menu")?)?;
    root.register(enter_spec("ca", "Comparison analysis menu")?)?;
    root.register(enter_spec("crypto", "Cryptocurrency menu")?)?;

    let mut tree = MenuTree::new("stocks", root);
    let root_id = tree.root();

    let mut ta_reg = CommandRegistry::new();
    ta_reg.register(ta::sma_spec(provider.clone())?)?;
    ta_reg.register(ta::ema_spec(provider.clone())?)?;
    ta_reg.register(ta::rsi_spec(provider.clone())?)?;
    tree.add_child(root_id, "ta", ta_reg)?;

    let mut fa_reg = CommandRegistry::new();
    fa_reg.register(fa::overview_spec(provider.clone())?)?;
    fa_reg.register(fa::income_spec(provider.clone())?)?;
    fa_reg.register(fa::balance_spec(provider.clone())?)?;
    fa_reg.register(fa::cashflow_spec(provider.clone())?)?;
    tree.add_child(root_id, "fa", fa_reg)?;

    let mut ca_reg = CommandRegistry::new();
    ca_reg.register(ca::get_spec(provider.clone())?)?;
    ca_reg.register(ca::select_spec()?)?;
    ca_reg.register(ca::historical_spec(provider.clone())?)?;
    ca_reg.register(ca::hcorr_spec(provider.clone())?)?;
    ca_reg.register(ca::sentiment_spec(provider.clone())?)?;
    ca_reg.register(ca::scorr_spec(provider.clone())?)?;
    ca_reg.register(ca::valuation_spec(provider.clone())?)?;
    ca_reg.register(ca::financial_spec(provider.clone())?)?;
    ca_reg.register(ca::ownership_spec(provider.clone())?)?;
    ca_reg.register(ca::performance_spec(provider.clone())?)?;
    ca_reg.register(ca::technical_spec(provider.clone())?)?;
    tree.add_child(root_id, "ca", ca_reg)?;

    let mut crypto_reg = CommandRegistry::new();
    crypto_reg.register(crypto::load_spec(provider.clone())?)?;
    crypto_reg.register(crypto::chart_spec(provider)?)?;
    tree.add_child(root_id, "crypto", crypto_reg)?;

    debug!("menu tree constructed");
    Ok(tree)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::SampleDataProvider;

    #[test]
    fn test_tree_builds_and_children_resolve() {
        let tree = build_menu_tree(Arc::new(SampleDataProvider::new())).unwrap();
        let root = tree.root();
        for name in ["ta", "fa", "ca", "crypto"] {
            assert!(tree.child_named(root, name).is_some(), "missing {name}");
        }
        assert!(tree.menu(root).registry().resolve("load").is_some());
        assert!(tree.menu(root).registry().resolve("view").is_some());

        let ca = tree.child_named(root, "ca").unwrap();
        for name in ["get", "select", "historical", "hcorr", "sentiment", "scorr", "valuation"] {
            assert!(tree.menu(ca).registry().resolve(name).is_some(), "missing {name}");
        }
    }
}
