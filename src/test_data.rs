#[cfg(test)]
use std::fs;
#[cfg(test)]
use std::path::Path;

#[cfg(test)]
pub const POST_A: &str = "---
id: a
title: First post
abstract: Where it starts
tags: [go]
pubdate: 2023-01-01T00:00:00Z
---
# First

Some words.
";

#[cfg(test)]
pub const POST_B: &str = "---
id: b
title: Second post
tags: [go, blog]
pubdate: 2023-06-01T00:00:00Z
---
# Second

More words.
";

#[cfg(test)]
pub const HEADER_SNIPPET: &str = "<header>{{#page}}{{title}}{{/page}}</header>\n\n";

#[cfg(test)]
pub const FOOTER_SNIPPET: &str = "\n<footer>{{#config}}{{site_url}}{{/config}}</footer>\n";

#[cfg(test)]
pub fn write_file(path: &Path, content: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}
