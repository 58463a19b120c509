use std::env;

use anyhow::{Context, Result};
use soapclient::{ClientOptions, SoapClient};

/// Loads a WSDL, lists its operations and optionally calls one:
/// `cargo run --example call_service -- <wsdl-url> [operation [args...]]`
fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let mut args = env::args().skip(1);
    let wsdl_url = args
        .next()
        .context("usage: call_service <wsdl-url> [operation [args...]]")?;

    let client = SoapClient::create(&wsdl_url, &ClientOptions::default())?;

    println!("Target URL : {}", client.url());
    println!("Operations :");
    for operation in client.wsdl().operation_names() {
        println!("- {operation}");
    }

    if let Some(operation) = args.next() {
        let rest: Vec<String> = args.collect();
        let refs: Vec<&str> = rest.iter().map(String::as_str).collect();
        let tree = client
            .call_method(&operation, &refs)
            .with_context(|| format!("calling {operation} failed"))?;
        println!("{}", soapxml::to_pretty_string(&tree)?);
    }

    Ok(())
}
