//! HTML rendering for the dashboard page.

use std::fmt::Write;

use wxpipe_core::{RecordTable, CITY_OPTIONS};

const STYLE: &str = "body{font-family:sans-serif;margin:2rem}\
table{border-collapse:collapse}\
th,td{border:1px solid #ccc;padding:.3rem .6rem;text-align:left}\
.error{color:#b00020}\
.badge{background:#8a2be2;color:#fff;border-radius:1rem;padding:.1rem .6rem;font-size:.8rem}";

/// What the page shows under the city selector.
#[derive(Debug)]
pub enum PageBody {
    Table(RecordTable),
    Error(String),
}

/// Render the full dashboard page with `selected` marked in the selector.
pub fn render_page(selected: &str, body: &PageBody) -> String {
    let mut html = String::with_capacity(2048);

    html.push_str("<!DOCTYPE html><html><head><meta charset=\"utf-8\">");
    html.push_str("<title>Weather Dashboard</title>");
    let _ = write!(html, "<style>{}</style></head><body>", STYLE);
    html.push_str("<h1>Weather Dashboard</h1><span class=\"badge\">Home</span>");

    render_selector(&mut html, selected);

    match body {
        PageBody::Table(table) => {
            if table.is_empty() {
                let _ = write!(
                    html,
                    "<p class=\"empty\">No records for {}.</p>",
                    escape(selected)
                );
            }
            render_table(&mut html, table);
        }
        PageBody::Error(message) => {
            let _ = write!(html, "<p class=\"error\">{}</p>", escape(message));
        }
    }

    html.push_str("</body></html>");
    html
}

fn render_selector(html: &mut String, selected: &str) {
    html.push_str("<form method=\"get\" action=\"/\">");
    html.push_str("<label for=\"city\">Select a city</label> ");
    html.push_str("<select id=\"city\" name=\"city\" onchange=\"this.form.submit()\">");
    for city in CITY_OPTIONS {
        let marker = if city == selected { " selected" } else { "" };
        let _ = write!(html, "<option value=\"{0}\"{1}>{0}</option>", escape(city), marker);
    }
    html.push_str("</select> <noscript><button type=\"submit\">Show</button></noscript></form>");
}

fn render_table(html: &mut String, table: &RecordTable) {
    html.push_str("<table><thead><tr>");
    for column in table.columns {
        let _ = write!(html, "<th>{}</th>", column);
    }
    html.push_str("</tr></thead><tbody>");
    for row in &table.rows {
        html.push_str("<tr>");
        for cell in row {
            let _ = write!(html, "<td>{}</td>", escape(cell));
        }
        html.push_str("</tr>");
    }
    html.push_str("</tbody></table>");
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use wxpipe_core::WeatherRecord;

    #[test]
    fn test_selector_marks_selection() {
        let html = render_page("Tokyo", &PageBody::Table(RecordTable::from_records(&[])));
        assert!(html.contains("<option value=\"Tokyo\" selected>Tokyo</option>"));
        assert!(html.contains("<option value=\"Berlin\">Berlin</option>"));
        assert!(html.contains("<option value=\"Sydney\">Sydney</option>"));
    }

    #[test]
    fn test_empty_table_still_has_header() {
        let html = render_page("Sydney", &PageBody::Table(RecordTable::from_records(&[])));
        assert!(html.contains("<th>date</th><th>city</th><th>temp</th><th>feels</th><th>description</th>"));
        assert!(html.contains("<tbody></tbody>"));
        assert!(html.contains("No records for Sydney."));
    }

    #[test]
    fn test_cells_are_escaped() {
        let record =
            WeatherRecord::from_row((1, "Berlin".into(), 1.0, 1.0, "<script>rain</script>".into()));
        let html = render_page("Berlin", &PageBody::Table(RecordTable::from_records(&[record])));
        assert!(html.contains("&lt;script&gt;rain&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_error_body() {
        let html = render_page("Berlin", &PageBody::Error("Database is down".into()));
        assert!(html.contains("<p class=\"error\">Database is down</p>"));
        assert!(!html.contains("<table>"));
    }
}
