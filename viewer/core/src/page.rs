const ECHARTS_SCRIPT: &str = "https://cdn.jsdelivr.net/npm/echarts@5.4.3/dist/echarts.min.js";

pub struct Page<'a> {
    pub title: &'a str,
    pub start_date: &'a str,
    pub end_date: &'a str,
    pub charts: &'a str,
}

impl Page<'_> {
    pub fn render(&self) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title}</title>
<script src="{ECHARTS_SCRIPT}"></script>
</head>
<body>
<form method="get" action="/">
<label>Start <input type="date" name="start" value="{start}" required></label>
<label>End <input type="date" name="end" value="{end}" required></label>
<button type="submit">Submit</button>
</form>
{charts}
</body>
</html>
"#,
            title = escape(self.title),
            start = escape(self.start_date),
            end = escape(self.end_date),
            charts = self.charts,
        )
    }
}

pub fn escape(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
