//! Parse an Apache combined-log line with named groups.
//!
//! Run with `RUST_LOG=regularize=debug cargo run --example apache_log` to see
//! the cache at work.

use regularize::prelude::*;
use tracing_subscriber::EnvFilter;

fn field(sub: &Pattern, name: &str) -> Result<Pattern> {
    Pattern::new().group_pattern(sub, GroupSpec::named(name))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let line = r#"127.0.0.1 - frank [10/Oct/2000:13:55:36 -0700] "GET /apache_pb.gif HTTP/1.0" 200 2326"#;

    let ip = field(
        &Pattern::new()
            .any_of([ClassMember::Char('.'), ClassMember::Digit])
            .at_least(7)?,
        "ip",
    )?;
    let user = field(&Pattern::new().word_characters().at_least_one()?, "user")?;
    let time = Pattern::from("[")
        .none_of([']'])
        .at_least_one()?
        .literal("]");
    let request = Pattern::from("\"")
        .concat(&field(&Pattern::new().uppercase_ascii_letters().at_least_one()?, "verb")?)?
        .whitespace()
        .concat(&field(&Pattern::new().non_whitespace().at_least_one()?, "url")?)?
        .whitespace()
        .none_of_chars("\"")
        .at_least_one()?
        .literal("\"");
    let status = field(&Pattern::new().digits().exactly(3)?, "status")?;
    let bytes = field(&Pattern::new().digits().at_least_one()?, "bytes")?;

    let log = Pattern::join(
        &Pattern::new().whitespace(),
        [&ip, &Pattern::from("-"), &user, &time, &request, &status, &bytes],
    )?;
    println!("pattern: {log}");

    let finder = Finder::new(log.clone());
    if let Some(m) = finder.match_at_start(line)? {
        for (name, value) in m.named_groups() {
            println!("{name:>8}: {value}");
        }
    }

    let summary = Substitution::new(log).replace(line, &Template::parse("$verb $url -> $status"))?;
    println!("summary: {summary}");
    Ok(())
}
