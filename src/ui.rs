use crate::render::{CalendarView, FilterView, Page, WeekGrid, WeekRow};

pub fn render_index(page: &Page) -> String {
    let week = render_week_grid(&page.week);
    let calendar = render_calendar_fragment(&page.calendar, &page.filter);
    let notice = escape_html(page.notice.unwrap_or(""));
    let today = escape_html(&page.today);

    fill_template(INDEX_HTML, |slot| match slot {
        "BODY_CLASS" => Some(if page.dark_mode { "dark-mode" } else { "" }),
        "NOTICE" => Some(notice.as_str()),
        "TODAY" => Some(today.as_str()),
        "DARK_ICON" => Some(if page.dark_mode { "\u{2600}\u{fe0f}" } else { "\u{1f319}" }),
        "WEEK" => Some(week.as_str()),
        "CALENDAR" => Some(calendar.as_str()),
        _ => None,
    })
}

/// Substitutes `{{SLOT}}` markers in a single left-to-right pass. Inserted
/// values are never scanned again, so user text that looks like a marker
/// stays literal. Unknown markers are copied through unchanged.
fn fill_template<'a>(template: &str, value_of: impl Fn(&str) -> Option<&'a str>) -> String {
    let mut out = String::with_capacity(template.len() * 2);
    let mut rest = template;
    while let Some(start) = rest.find("{{") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 2..];
        match after.find("}}").and_then(|end| value_of(&after[..end]).map(|value| (end, value))) {
            Some((end, value)) => {
                out.push_str(value);
                rest = &after[end + 2..];
            }
            None => {
                out.push_str("{{");
                rest = after;
            }
        }
    }
    out.push_str(rest);
    out
}

pub fn render_week_grid(grid: &WeekGrid) -> String {
    let mut html = String::from("<div class=\"grid-row grid-head\"><div>Habit</div>");
    for key in &grid.days {
        html.push_str(&format!("<div class=\"center\">{}</div>", escape_html(day_label(key))));
    }
    html.push_str("<div>Streak</div><div>Actions</div></div>");

    for row in &grid.rows {
        match row {
            WeekRow::Placeholder { label, streak, hint } => {
                html.push_str(&format!("<div class=\"grid-row\"><div class=\"name\">{label}</div>"));
                for _ in &grid.days {
                    html.push_str("<div class=\"center\"></div>");
                }
                html.push_str(&format!(
                    "<div class=\"streak\">{streak}</div><div class=\"muted\">{hint}</div></div>"
                ));
            }
            WeekRow::Habit(habit) => {
                let id = escape_html(&urlencoding::encode(&habit.id));
                let name = escape_html(&habit.name);
                html.push_str(&format!(
                    "<div class=\"grid-row\"><div class=\"name\" title=\"{name}\">{name}</div>"
                ));
                for cell in &habit.cells {
                    html.push_str(&format!(
                        concat!(
                            "<div class=\"center\"><form method=\"post\" action=\"/habits/{id}/toggle\">",
                            "<input type=\"hidden\" name=\"date\" value=\"{date}\" />",
                            "<button type=\"submit\" class=\"day{class}\" role=\"checkbox\" ",
                            "aria-checked=\"{checked}\" aria-label=\"{label}\">{text}</button>",
                            "</form></div>"
                        ),
                        id = id,
                        date = escape_html(&cell.date),
                        class = if cell.checked { " done" } else { "" },
                        checked = cell.checked,
                        label = escape_html(&cell.label),
                        text = if cell.checked { "Yes" } else { "" },
                    ));
                }
                html.push_str(&format!(
                    concat!(
                        "<div class=\"streak\">{streak}</div><div class=\"actions\">",
                        "<form method=\"post\" action=\"/habits/{id}/tick\">",
                        "<button type=\"submit\" class=\"tick\">Tick today</button></form>",
                        "<form method=\"post\" action=\"/habits/{id}/delete\" ",
                        "data-confirm=\"Delete &quot;{name}&quot;?\">",
                        "<input type=\"hidden\" name=\"confirm\" value=\"true\" />",
                        "<button type=\"submit\" class=\"delete\" aria-label=\"Delete {name}\">",
                        "\u{2715}</button></form></div></div>"
                    ),
                    streak = habit.streak,
                    id = id,
                    name = name,
                ));
            }
        }
    }
    html
}

/// Month grid plus the habit filter; served alone when only the calendar
/// needs refreshing.
pub fn render_calendar_fragment(calendar: &CalendarView, filter: &FilterView) -> String {
    let mut html = format!(
        concat!(
            "<div class=\"calendar-nav\">",
            "<form method=\"post\" action=\"/calendar/prev\" data-calendar>",
            "<button type=\"submit\" id=\"prev-month\" aria-label=\"Previous month\">&#8249;</button></form>",
            "<h2 id=\"calendar-month-year\">{title}</h2>",
            "<form method=\"post\" action=\"/calendar/next\" data-calendar>",
            "<button type=\"submit\" id=\"next-month\" aria-label=\"Next month\">&#8250;</button></form>",
            "</div><div id=\"calendar-grid\" class=\"calendar-grid\">"
        ),
        title = escape_html(&calendar.title),
    );

    for weekday in calendar.weekdays {
        html.push_str(&format!("<div class=\"calendar-weekday\">{weekday}</div>"));
    }
    for cell in &calendar.cells {
        let mut class = String::from("calendar-day");
        if !cell.in_month {
            class.push_str(" other-month");
        }
        if cell.is_today {
            class.push_str(" today");
        }
        html.push_str(&format!("<div class=\"{class}\">{}", cell.day));
        for marker in &cell.markers {
            html.push_str(&format!(
                "<span class=\"dot\" style=\"background:{}\" title=\"{}\"></span>",
                marker.color,
                escape_html(&marker.habit)
            ));
        }
        html.push_str("</div>");
    }
    html.push_str("</div>");

    html.push_str("<form id=\"habit-filter\" class=\"habit-filter\" method=\"post\" action=\"/calendar/filter\" data-calendar>");
    if filter.entries.is_empty() {
        html.push_str("<p>No habits found yet. Add or complete some habits to see them here.</p>");
    } else {
        for entry in &filter.entries {
            let name = escape_html(&entry.name);
            html.push_str(&format!(
                concat!(
                    "<label><input type=\"checkbox\" name=\"habit\" value=\"{name}\"{checked} />",
                    "<span class=\"swatch\" style=\"background:{color}\"></span>{name}</label>"
                ),
                name = name,
                checked = if entry.selected { " checked" } else { "" },
                color = entry.color,
            ));
        }
        html.push_str("<noscript><button type=\"submit\">Apply filter</button></noscript>");
    }
    html.push_str("</form>");
    html
}

fn day_label(key: &str) -> &str {
    key.get(5..).unwrap_or(key)
}

pub fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

const INDEX_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Habit Tracker</title>
  <style>
    :root {
      --bg: #f4f8fb;
      --card: #ffffff;
      --ink: #0b3b58;
      --muted: #66788a;
      --line: #eef2f6;
      --border: #dbe7f0;
      --done-bg: #e9f8ef;
      --done-ink: #1e9e4a;
    }

    body.dark-mode {
      --bg: #121821;
      --card: #1b2430;
      --ink: #e3edf5;
      --muted: #93a4b5;
      --line: #27313d;
      --border: #334252;
      --done-bg: #1d3b2a;
      --done-ink: #6fdc97;
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      background: var(--bg);
      color: var(--ink);
      font-family: system-ui, "Segoe UI", sans-serif;
      padding: 24px 16px 64px;
    }

    main {
      max-width: 980px;
      margin: 0 auto;
      display: grid;
      gap: 24px;
    }

    section {
      background: var(--card);
      border-radius: 14px;
      border: 1px solid var(--border);
      padding: 20px;
    }

    h1, h2 {
      margin: 0;
    }

    button {
      cursor: pointer;
      font: inherit;
    }

    form {
      margin: 0;
    }

    #habit-form {
      display: flex;
      gap: 8px;
    }

    #habit-form input {
      flex: 1;
      padding: 10px;
      border-radius: 8px;
      border: 1px solid var(--border);
    }

    .grid-row {
      display: grid;
      grid-template-columns: 1.6fr repeat(7, .9fr) .8fr 1fr;
      align-items: center;
      border-bottom: 1px solid var(--line);
    }

    .grid-row > div {
      padding: 10px;
    }

    .grid-head {
      font-weight: 600;
      color: var(--muted);
    }

    .name {
      white-space: nowrap;
      overflow: hidden;
      text-overflow: ellipsis;
    }

    .center {
      text-align: center;
    }

    .muted {
      color: var(--muted);
    }

    .streak {
      font-variant-numeric: tabular-nums;
    }

    .day {
      display: flex;
      align-items: center;
      justify-content: center;
      width: 36px;
      height: 36px;
      margin: auto;
      border-radius: 8px;
      border: 1px solid var(--border);
      background: var(--card);
      color: inherit;
      user-select: none;
    }

    .day.done {
      background: var(--done-bg);
      color: var(--done-ink);
      font-weight: 700;
    }

    .actions {
      display: flex;
      gap: 8px;
      flex-wrap: wrap;
    }

    .tick {
      background: var(--card);
      border: 1px solid var(--border);
      color: var(--ink);
      padding: 6px 10px;
      border-radius: 8px;
    }

    .delete {
      padding: 6px 12px;
      border: none;
      background: #fee;
      color: #c00;
      border-radius: 4px;
      font-weight: 700;
    }

    .data-controls {
      display: flex;
      gap: 12px;
      flex-wrap: wrap;
      align-items: center;
    }

    .calendar-nav {
      display: flex;
      align-items: center;
      justify-content: space-between;
      margin-bottom: 12px;
    }

    .calendar-grid {
      display: grid;
      grid-template-columns: repeat(7, 1fr);
      gap: 4px;
    }

    .calendar-weekday {
      text-align: center;
      font-weight: 600;
      color: var(--muted);
    }

    .calendar-day {
      min-height: 56px;
      padding: 6px;
      border-radius: 8px;
      border: 1px solid var(--line);
    }

    .calendar-day.other-month {
      opacity: 0.4;
    }

    .calendar-day.today {
      border-color: var(--done-ink);
    }

    .dot {
      display: inline-block;
      width: 8px;
      height: 8px;
      border-radius: 50%;
      margin-left: 3px;
    }

    .habit-filter {
      margin-top: 12px;
    }

    .habit-filter label {
      display: inline-flex;
      align-items: center;
      gap: 5px;
      margin-right: 12px;
    }

    .swatch {
      display: inline-block;
      width: 12px;
      height: 12px;
      border-radius: 50%;
    }

    #dark-mode-toggle {
      position: fixed;
      right: 20px;
      bottom: 20px;
      width: 44px;
      height: 44px;
      border-radius: 50%;
      border: 1px solid var(--border);
      background: var(--card);
    }
  </style>
</head>
<body class="{{BODY_CLASS}}" data-notice="{{NOTICE}}">
  <main>
    <header>
      <h1>Habit Tracker</h1>
      <p class="muted">Week ending {{TODAY}}</p>
    </header>

    <section>
      <form id="habit-form" method="post" action="/habits">
        <input id="habit-name" name="name" placeholder="New habit" autocomplete="off" required />
        <button type="submit">Add habit</button>
      </form>
    </section>

    <section id="rows">
{{WEEK}}
    </section>

    <section class="data-controls">
      <a id="export-json" href="/export" download="habits-export.json">Export JSON</a>
      <form id="import-form" method="post" action="/import" enctype="multipart/form-data">
        <input id="import-json" type="file" name="file" accept="application/json,.json" />
        <noscript><button type="submit">Import</button></noscript>
      </form>
      <form method="post" action="/reset" data-confirm="Delete all habits and logs?">
        <input type="hidden" name="confirm" value="true" />
        <button id="reset-all" type="submit">Reset all</button>
      </form>
    </section>

    <section id="calendar">
{{CALENDAR}}
    </section>
  </main>

  <form method="post" action="/dark-mode">
    <button id="dark-mode-toggle" type="submit" aria-label="Toggle dark mode">{{DARK_ICON}}</button>
  </form>

  <script>
    const calendarEl = document.getElementById('calendar');

    document.addEventListener('submit', (event) => {
      const form = event.target;
      if (form.dataset.confirm !== undefined && !confirm(form.dataset.confirm)) {
        event.preventDefault();
        return;
      }
      if (form.dataset.calendar !== undefined) {
        event.preventDefault();
        postCalendar(form);
      }
    });

    const refreshCalendar = async () => {
      const res = await fetch('/fragments/calendar');
      if (res.ok) {
        calendarEl.innerHTML = await res.text();
      }
    };

    const postCalendar = async (form) => {
      await fetch(form.action, {
        method: 'POST',
        body: new URLSearchParams(new FormData(form)),
        redirect: 'manual'
      });
      await refreshCalendar();
    };

    calendarEl.addEventListener('change', (event) => {
      if (event.target.name === 'habit') {
        postCalendar(event.target.form);
      }
    });

    document.getElementById('import-json').addEventListener('change', (event) => {
      if (event.target.files && event.target.files.length) {
        event.target.form.submit();
      }
    });

    if (document.body.dataset.notice) {
      window.addEventListener('load', () => alert(document.body.dataset.notice));
    }
  </script>
</body>
</html>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AppData, Habit};
    use crate::render::{assign_colors, render_page};
    use crate::state::{Notice, ViewState};
    use crate::views::{week_keys_at, CalendarMonth};
    use chrono::NaiveDate;

    fn page_for(data: &AppData, view: &mut ViewState) -> Page {
        let today = NaiveDate::from_ymd_opt(2026, 1, 5).unwrap();
        assign_colors(view, data);
        render_page(data, view, &week_keys_at(today), today)
    }

    #[test]
    fn escape_html_covers_markup() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom & 'Jerry'</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom &amp; &#39;Jerry&#39;&lt;/a&gt;"
        );
    }

    #[test]
    fn index_escapes_habit_names() {
        let data = AppData {
            habits: vec![Habit {
                id: "h1".to_string(),
                name: "<script>".to_string(),
                log: [("2026-01-05".to_string(), true)].into(),
            }],
        };
        let mut view = ViewState::new(CalendarMonth::new(2026, 1).unwrap(), false);
        let html = render_index(&page_for(&data, &mut view));

        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt; on 2026-01-05"));
        assert!(html.contains("aria-checked=\"true\""));
        assert!(html.contains("/habits/h1/delete"));
        assert!(!html.contains("{{"));
    }

    #[test]
    fn index_keeps_marker_like_names_literal() {
        let data = AppData {
            habits: vec![Habit {
                id: "h1".to_string(),
                name: "{{CALENDAR}}".to_string(),
                log: Default::default(),
            }],
        };
        let mut view = ViewState::new(CalendarMonth::new(2026, 1).unwrap(), false);
        let html = render_index(&page_for(&data, &mut view));

        assert_eq!(html.matches("id=\"calendar-grid\"").count(), 1);
        assert_eq!(html.matches("id=\"rows\"").count(), 1);
        assert!(html.contains("title=\"{{CALENDAR}}\">{{CALENDAR}}</div>"));
        assert!(html.contains("data-confirm=\"Delete &quot;{{CALENDAR}}&quot;?\""));
    }

    #[test]
    fn fill_template_passes_unknown_markers_through() {
        let out = fill_template("a {{X}} b {{Y}} {{open", |slot| (slot == "X").then_some("{{Y}}"));
        assert_eq!(out, "a {{Y}} b {{Y}} {{open");
    }

    #[test]
    fn habit_ids_are_encoded_as_path_segments() {
        let data = AppData {
            habits: vec![Habit {
                id: "a/b?c#d%".to_string(),
                name: "Read".to_string(),
                log: Default::default(),
            }],
        };
        let mut view = ViewState::new(CalendarMonth::new(2026, 1).unwrap(), false);
        let html = render_index(&page_for(&data, &mut view));

        assert!(html.contains("action=\"/habits/a%2Fb%3Fc%23d%25/toggle\""));
        assert!(html.contains("action=\"/habits/a%2Fb%3Fc%23d%25/tick\""));
        assert!(html.contains("action=\"/habits/a%2Fb%3Fc%23d%25/delete\""));
        assert!(!html.contains("/habits/a/b"));
    }

    #[test]
    fn index_shows_placeholder_and_notice() {
        let mut view = ViewState::new(CalendarMonth::new(2026, 1).unwrap(), true);
        view.notice = Some(Notice::ImportFailed);
        let html = render_index(&page_for(&AppData::default(), &mut view));

        assert!(html.contains("No habits yet"));
        assert!(html.contains("Add a habit"));
        assert!(html.contains("class=\"dark-mode\""));
        assert!(html.contains("data-notice=\"Import failed. Please check the JSON file format.\""));
        assert!(html.contains("No habits found yet"));
    }

    #[test]
    fn calendar_fragment_lists_filter_entries() {
        let data = AppData {
            habits: vec![Habit {
                id: "h1".to_string(),
                name: "Read".to_string(),
                log: [("2026-01-05".to_string(), true)].into(),
            }],
        };
        let mut view = ViewState::new(CalendarMonth::new(2026, 1).unwrap(), false);
        view.filter.insert("Read".to_string());
        let page = page_for(&data, &mut view);
        let html = render_calendar_fragment(&page.calendar, &page.filter);

        assert!(html.contains("January 2026"));
        assert!(html.contains("value=\"Read\" checked"));
        assert!(html.contains("class=\"dot\" style=\"background:#4CAF50\""));
    }
}
