//! End-to-end dispatch scenarios over the full menu tree
//!
//! Drives the dispatcher exactly the way the interactive binary does, one
//! line at a time, using the offline sample provider.

use std::sync::Arc;
use terminal_engine::{Dispatcher, LoopState, TerminalConfig};
use terminal_market::{SampleDataProvider, build_menu_tree, keys};

fn dispatcher() -> Dispatcher {
    let tree = build_menu_tree(Arc::new(SampleDataProvider::new())).expect("tree builds");
    Dispatcher::new(tree, TerminalConfig::default())
}

#[tokio::test]
async fn load_then_view_round_trip() {
    let mut d = dispatcher();

    let reply = d.dispatch_line("load -t GME").await;
    assert!(reply.text.unwrap().contains("Loaded GME"));
    assert_eq!(d.context().require_ticker().unwrap(), "GME");
    assert!(d.context().window().is_some());

    let reply = d.dispatch_line("view").await;
    let text = reply.text.unwrap();
    assert!(text.contains("GME"));
    assert!(text.contains("close"));
}

#[tokio::test]
async fn view_without_load_is_a_recoverable_precondition_failure() {
    let mut d = dispatcher();
    let before = d.context().clone();

    let reply = d.dispatch_line("view").await;
    assert!(reply.text.unwrap().contains("no ticker loaded"));
    assert!(!reply.quit);
    assert_eq!(d.context(), &before);
    assert_eq!(d.state(), LoopState::AwaitingInput);
}

#[tokio::test]
async fn ta_submenu_sma_scenario() {
    let mut d = dispatcher();
    d.dispatch_line("load -t GME -s 2021-01-01 -e 2021-06-01").await;

    d.dispatch_line("ta").await;
    assert_eq!(d.current_menu(), "ta");

    let reply = d.dispatch_line("sma -l 10").await;
    assert!(reply.text.unwrap().contains("SMA(10) for GME"));

    // Bad type: parse error names the flag, handler never runs
    let before = d.context().clone();
    let reply = d.dispatch_line("sma -l abc").await;
    let text = reply.text.unwrap();
    assert!(text.contains("-l/--length"));
    assert!(text.contains("abc"));
    assert_eq!(d.context(), &before);
}

#[tokio::test]
async fn comparison_flow_persists_selection_across_navigation() {
    let mut d = dispatcher();
    d.dispatch_line("load -t GME").await;

    d.dispatch_line("ca").await;
    d.dispatch_line("select -s amc,bb").await;
    let similar: Vec<String> = d.context().get_typed(keys::SIMILAR).unwrap();
    assert_eq!(similar, vec!["AMC", "BB"]);

    // Leave and re-enter: selection is session state, not menu state
    d.dispatch_line("up").await;
    d.dispatch_line("ca").await;
    let reply = d.dispatch_line("historical").await;
    assert!(reply.text.unwrap().contains("AMC"));
}

#[tokio::test]
async fn crypto_menu_keeps_stock_session_intact() {
    let mut d = dispatcher();
    d.dispatch_line("load -t GME").await;

    d.dispatch_line("crypto").await;
    d.dispatch_line("load -c bitcoin").await;
    let reply = d.dispatch_line("chart -d 7").await;
    assert!(reply.text.unwrap().contains("bitcoin over 7 days"));

    // The equity ticker survived the crypto detour
    assert_eq!(d.context().require_ticker().unwrap(), "GME");
}

#[tokio::test]
async fn chart_day_bounds_are_enforced() {
    let mut d = dispatcher();
    d.dispatch_line("crypto").await;
    d.dispatch_line("load -c bitcoin").await;

    // A value past u32::MAX must be rejected, not wrapped to 7 days
    let reply = d.dispatch_line("chart -d 4294967303").await;
    let text = reply.text.unwrap();
    assert!(text.contains("between 1 and 3650"));
    assert!(!text.contains("over 7 days"));

    let reply = d.dispatch_line("chart -d 1000000000").await;
    assert!(reply.text.unwrap().contains("between 1 and 3650"));
}

#[tokio::test]
async fn comparison_screens_and_sentiment_over_selection() {
    let mut d = dispatcher();
    d.dispatch_line("load -t GME").await;
    d.dispatch_line("ca").await;
    d.dispatch_line("get").await;

    let reply = d.dispatch_line("valuation").await;
    let text = reply.text.unwrap();
    assert!(text.contains("Valuation screen"));
    assert!(text.contains("GME"));
    assert!(text.contains("AMC"));

    let reply = d.dispatch_line("sentiment -d 7").await;
    assert!(reply.text.unwrap().contains("last 7 days"));

    let reply = d.dispatch_line("scorr").await;
    assert!(reply.text.unwrap().contains("Sentiment correlation"));
}

#[tokio::test]
async fn help_flag_anywhere_never_mutates() {
    let mut d = dispatcher();
    let before = d.context().clone();

    let reply = d.dispatch_line("load -t GME -h").await;
    let text = reply.text.unwrap();
    assert!(text.contains("-t/--ticker"));
    assert_eq!(d.context(), &before);
}

#[tokio::test]
async fn navigation_meta_commands() {
    let mut d = dispatcher();

    let reply = d.dispatch_line("up").await;
    assert!(reply.text.unwrap().contains("Already at the root"));

    d.dispatch_line("ta").await;
    d.dispatch_line("fa").await; // unknown inside ta
    assert_eq!(d.current_menu(), "ta");

    d.dispatch_line("home").await;
    assert_eq!(d.current_menu(), "stocks");
    d.dispatch_line("fa").await;
    assert_eq!(d.current_menu(), "fa");

    let reply = d.dispatch_line("quit").await;
    assert!(reply.quit);
}

#[tokio::test]
async fn reset_clears_everything_explicitly() {
    let mut d = dispatcher();
    d.dispatch_line("load -t GME").await;
    d.dispatch_line("ca").await;
    d.dispatch_line("select -s amc").await;
    d.dispatch_line("home").await;

    d.dispatch_line("reset").await;
    assert!(d.context().ticker().is_none());
    assert!(d.context().get_typed::<Vec<String>>(keys::SIMILAR).is_none());
}
