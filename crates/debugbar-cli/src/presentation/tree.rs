use std::fmt;

use debugbar_types::RequestNode;
use owo_colors::OwoColorize;

use super::{FormatOptions, truncate};

/// Narrowest URL column kept when the terminal is very small.
const MIN_URL_WIDTH: usize = 20;

/// Indented rendering of a request forest, one request per line:
///
/// ```text
/// POST 302 http://shop.test/orders (10:00:00)
/// └─ GET 200 http://shop.test/orders/7 (10:00:01)
/// ```
pub struct RequestTreeView<'a> {
    forest: &'a [RequestNode],
    options: &'a FormatOptions,
}

impl<'a> RequestTreeView<'a> {
    pub fn new(forest: &'a [RequestNode], options: &'a FormatOptions) -> Self {
        Self { forest, options }
    }

    fn write_node(
        &self,
        f: &mut fmt::Formatter<'_>,
        node: &RequestNode,
        prefix: &str,
        branch: &str,
    ) -> fmt::Result {
        let record = &node.record;
        let status = if record.status > 0 {
            record.status.to_string()
        } else {
            "---".to_string()
        };

        let url = match self.options.max_width {
            Some(width) => {
                let fixed = prefix.chars().count()
                    + branch.chars().count()
                    + record.method.len()
                    + status.len()
                    + record.time.len()
                    + 5;
                truncate(&record.url, width.saturating_sub(fixed).max(MIN_URL_WIDTH))
            }
            None => record.url.clone(),
        };

        write!(f, "{}{}", prefix, branch)?;
        if self.options.enable_color {
            writeln!(
                f,
                "{} {} {} {}",
                record.method.bold(),
                paint_status(&status, record.status),
                url,
                format!("({})", record.time).bright_black()
            )?;
        } else {
            writeln!(f, "{} {} {} ({})", record.method, status, url, record.time)?;
        }

        let child_prefix = match branch {
            "├─ " => format!("{}│  ", prefix),
            "└─ " => format!("{}   ", prefix),
            _ => prefix.to_string(),
        };
        for (i, child) in node.children.iter().enumerate() {
            let branch = if i + 1 == node.children.len() {
                "└─ "
            } else {
                "├─ "
            };
            self.write_node(f, child, &child_prefix, branch)?;
        }
        Ok(())
    }
}

fn paint_status(text: &str, status: i64) -> String {
    match status {
        200..=299 => text.green().to_string(),
        300..=399 => text.cyan().to_string(),
        400..=499 => text.yellow().to_string(),
        500..=599 => text.red().to_string(),
        _ => text.dimmed().to_string(),
    }
}

impl fmt::Display for RequestTreeView<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.forest.is_empty() {
            return writeln!(f, "No requests recorded.");
        }

        for root in self.forest {
            self.write_node(f, root, "", "")?;
        }
        Ok(())
    }
}
