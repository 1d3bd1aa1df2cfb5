use crosspane_codec::{decode_message, Message};
use crosspane_peer::{control, Dispatch, OriginPolicy, Peer, Registration};
use crosspane_transport::{EventSource, LocalContext, MessagePort};

use crate::cmd::DemoArgs;
use crate::exit::{peer_error, transport_error, CliResult, SUCCESS};
use crate::output::{print_schema_table, schema_entries, OutputFormat};

/// Scripted exchange between a parent peer and a pane peer, both living in
/// this process. Walks the whole protocol surface: registration broadcast,
/// handler invocation, remote append, unknown-type warning, and (with
/// `--strict`) origin rejection.
pub fn run(args: DemoArgs, format: OutputFormat) -> CliResult<i32> {
    let (parent_ctx, pane_ctx) = LocalContext::pair(&args.parent_origin, &args.pane_origin);

    let parent_policy = if args.strict {
        OriginPolicy::exact(&args.pane_origin)
    } else {
        OriginPolicy::Any
    };
    let pane_policy = if args.strict {
        OriginPolicy::exact(&args.parent_origin)
    } else {
        OriginPolicy::Any
    };

    let mut intruder = LocalContext::new("https://intruder.example");
    let intruder_to_parent = intruder.port_to(&parent_ctx);

    let mut parent = Peer::new(Box::new(parent_ctx.port_to(&pane_ctx)), parent_policy);
    let mut pane = Peer::new(Box::new(pane_ctx.port_to(&parent_ctx)), pane_policy);
    parent
        .bind(Box::new(parent_ctx))
        .map_err(|err| peer_error("bind failed", err))?;
    pane.bind(Box::new(pane_ctx))
        .map_err(|err| peer_error("bind failed", err))?;

    step(1, "parent registers a \"greet\" handler");
    parent
        .register_handler("greet", Registration::source("(msg){ log-content }"))
        .map_err(|err| peer_error("registration failed", err))?;
    report(
        "pane",
        pane.pump().map_err(|err| peer_error("pump failed", err))?,
    );

    step(2, "pane sends {\"greet\": \"hello from the pane\"}");
    pane.send(&Message::new("greet", "hello from the pane"))
        .map_err(|err| peer_error("send failed", err))?;
    report(
        "parent",
        parent.pump().map_err(|err| peer_error("pump failed", err))?,
    );

    step(3, "pane asks parent to append a \"farewell\" handler");
    pane.send(&control::append_request("farewell", "(msg){ warn-content }"))
        .map_err(|err| peer_error("send failed", err))?;
    report(
        "parent",
        parent.pump().map_err(|err| peer_error("pump failed", err))?,
    );
    report(
        "pane",
        pane.pump().map_err(|err| peer_error("pump failed", err))?,
    );

    step(4, "pane sends {\"farewell\": \"goodbye\"}");
    pane.send(&Message::new("farewell", "goodbye"))
        .map_err(|err| peer_error("send failed", err))?;
    report(
        "parent",
        parent.pump().map_err(|err| peer_error("pump failed", err))?,
    );

    step(5, "pane sends a message type nobody registered");
    pane.send(&Message::new("mystery", "?"))
        .map_err(|err| peer_error("send failed", err))?;
    report(
        "parent",
        parent.pump().map_err(|err| peer_error("pump failed", err))?,
    );
    report(
        "pane",
        pane.pump().map_err(|err| peer_error("pump failed", err))?,
    );

    if args.strict {
        step(6, "an intruder context posts at the parent");
        intruder_to_parent
            .post(r#"{"greet":"let me in"}"#, "*")
            .map_err(|err| transport_error("post failed", err))?;
        report(
            "parent",
            parent.pump().map_err(|err| peer_error("pump failed", err))?,
        );
        if let Ok(Some(event)) = intruder.try_next() {
            if let Ok(denial) = decode_message(event.payload.as_deref().unwrap_or("")) {
                println!("  intruder received: {{{}: {}}}", denial.kind(), denial.content());
            }
        }
    }

    println!();
    println!("final parent schema:");
    let announcement = control::schema_announcement(&crosspane_schema::encode_schema(
        parent.schema(),
    ))
    .map_err(|err| crate::exit::codec_error("schema encode failed", err))?;
    match format {
        OutputFormat::Table | OutputFormat::Pretty => {
            if let Some(entries) = schema_entries(&announcement) {
                print_schema_table(&entries);
            }
        }
        _ => {
            println!("{}", announcement.content());
        }
    }

    Ok(SUCCESS)
}

fn step(number: usize, description: &str) {
    println!("[{number}] {description}");
}

fn report(side: &str, outcomes: Vec<Dispatch>) {
    for outcome in outcomes {
        println!("  {side}: {outcome:?}");
    }
}
