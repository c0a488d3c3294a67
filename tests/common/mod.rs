//! Common test utilities

use suchna::config::Config;

/// Render a notice-board page from (title, href) rows
pub fn notice_page(rows: &[(&str, &str)]) -> String {
    let mut html = String::from(
        "<html><body>\n<table>\n<tr><th>Notice</th><th>Posted</th></tr>\n",
    );
    for (title, href) in rows {
        html.push_str(&format!(
            "<tr><td><a href=\"{href}\">{title}</a></td><td>view</td></tr>\n"
        ));
    }
    html.push_str("</table>\n</body></html>");
    html
}

/// Default config pointed at a test source URL
#[allow(dead_code)]
pub fn test_config(source_url: &str) -> Config {
    let mut config = Config::default();
    config.source.url = source_url.to_string();
    config
}
