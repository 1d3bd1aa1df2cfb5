//! Two peers in one process — a parent document and an embedded pane.
//!
//! Run with:
//!   cargo run --example parent-pane

use crosspane::codec::Message;
use crosspane::peer::{control, OriginPolicy, Peer, Registration};
use crosspane::transport::LocalContext;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let (parent_ctx, pane_ctx) = LocalContext::pair("https://app.example", "https://pane.example");

    let mut parent = Peer::new(
        Box::new(parent_ctx.port_to(&pane_ctx)),
        OriginPolicy::exact("https://pane.example"),
    );
    let mut pane = Peer::new(
        Box::new(pane_ctx.port_to(&parent_ctx)),
        OriginPolicy::exact("https://app.example"),
    );
    parent.bind(Box::new(parent_ctx))?;
    pane.bind(Box::new(pane_ctx))?;

    // Registering broadcasts the schema; the pane sees the announcement.
    parent.register_handler(
        "greet",
        Registration::callable(
            crosspane::codec::HandlerSource::new("msg", "print-content"),
            |message| println!("parent handled: {}", message.content_text()),
        ),
    )?;
    for outcome in pane.pump()? {
        eprintln!("pane:   {outcome:?}");
    }

    // The pane speaks; the parent's handler runs.
    pane.send(&Message::new("greet", "hello from the pane"))?;
    for outcome in parent.pump()? {
        eprintln!("parent: {outcome:?}");
    }

    // The pane installs a handler on the parent remotely.
    pane.send(&control::append_request("farewell", "(msg){ log-content }"))?;
    for outcome in parent.pump()? {
        eprintln!("parent: {outcome:?}");
    }

    pane.send(&Message::new("farewell", "goodbye"))?;
    for outcome in parent.pump()? {
        eprintln!("parent: {outcome:?}");
    }

    Ok(())
}
