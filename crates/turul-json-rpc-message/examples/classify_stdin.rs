//! Line-oriented JSON-RPC classifier
//!
//! Reads one JSON document per line from stdin, classifies it and prints a
//! summary. Rejected documents are answered with the error response an RPC
//! runtime would send back.
//!
//! ```text
//! echo '{"jsonrpc":"2.0","method":"ping","id":1}' | RUST_LOG=debug cargo run --example classify_stdin
//! ```

use std::io::{self, BufRead};

use tracing::info;
use turul_json_rpc_message::{
    Classifier, ClassifierConfig, ErrorObjectPolicy, JsonRpcMessage, JsonRpcResponse, RequestId,
    ResponseOutcome, encode,
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(io::stderr)
        .init();

    let policy = match std::env::var("JSONRPC_ERROR_OBJECT_POLICY").as_deref() {
        Ok("lenient") => ErrorObjectPolicy::Lenient,
        _ => ErrorObjectPolicy::Strict,
    };
    let classifier = Classifier::new(ClassifierConfig::new().with_error_object_policy(policy));
    info!(?policy, "Reading JSON-RPC documents from stdin");

    for line in io::stdin().lock().lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }

        match classifier.classify(&line) {
            Ok(message) => describe(&message),
            Err(err) => {
                // Without a trustworthy id, answer with id 0
                let reply = JsonRpcResponse::for_rejected(RequestId::new(0), &err);
                println!("rejected: {}", err);
                println!("  reply: {}", encode(&reply.into())?);
            }
        }
    }

    Ok(())
}

fn describe(message: &JsonRpcMessage) {
    match message {
        JsonRpcMessage::Notification(n) => {
            println!("notification {} params={:?}", n.method(), n.params());
        }
        JsonRpcMessage::Request(r) => {
            println!("request #{} {} params={:?}", r.id(), r.method(), r.params());
        }
        JsonRpcMessage::Response(r) => match r.outcome() {
            ResponseOutcome::Result(result) => println!("result #{} {}", r.id(), result),
            ResponseOutcome::Error(error) => println!("error #{} {}", r.id(), error),
        },
    }
}
