//! `--version` banner.

use std::io::{self, Write};

use crate::config::{ISSUES_URL, PRODUCT_PRETTY, VENDOR};

pub fn issues_notice() -> String {
    format!(
        "Please direct bug reports and questions to the GitHub Issues page at <{}>",
        ISSUES_URL
    )
}

pub fn banner() -> String {
    let (author, email) = author_and_email(env!("CARGO_PKG_AUTHORS"));
    format!(
        "{vendor} {product} Debug Dump v{version}\n\
         \n\
         Copyright (C) 2021 {vendor} Systems, Inc.\n\
         {vendor} {product} Debug Dump comes with ABSOLUTELY NO WARRANTY.\n\
         This is free software, and you are welcome to redistribute it\n\
         under certain conditions. Please review the LICENSE file ({license}) for details.\n\
         \n\
         Originally written by {author} <{email}>\n\
         {issues}",
        vendor = VENDOR,
        product = PRODUCT_PRETTY,
        version = env!("CARGO_PKG_VERSION"),
        license = env!("CARGO_PKG_LICENSE"),
        author = author,
        email = email,
        issues = issues_notice(),
    )
}

pub fn run(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out, "{}", banner())
}

/// Split the first `Name <email>` entry of a Cargo authors list.
fn author_and_email(authors: &str) -> (&str, &str) {
    let first = authors.split(':').next().unwrap_or_default();
    match first.split_once('<') {
        Some((name, rest)) => (name.trim(), rest.trim_end_matches('>').trim()),
        None => (first.trim(), ""),
    }
}
