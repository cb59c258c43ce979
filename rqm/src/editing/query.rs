//! Search query helpers

/// Escape Lucene special characters in free text for the search server
///
/// Every character in `- [ ] { } ( ) * + ? ~ : \ ^ ! "` gets a backslash,
/// and so does every `&&` and `||`. The browser editors send those two
/// operators unescaped, which turns a title like `Salt && Pepa` into a
/// boolean query; here they always reach the search server as text.
pub fn lucene_escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        if matches!(
            c,
            '-' | '[' | ']' | '{' | '}' | '(' | ')' | '*' | '+' | '?' | '~' | ':' | '\\' | '^' | '!' | '"'
        ) {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped.replace("&&", "\\&&").replace("||", "\\||")
}
