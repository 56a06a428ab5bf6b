//! Pure HTML rendering of the selector.
//!
//! Every function here takes state and returns markup; nothing is patched in
//! place. All interpolated text goes through `escape_html`.

use super::state::{ResultsPanel, SelectorState, Severity};
use crate::config::APP_NAME;
use crate::models::Prediction;

/// Escape text for use in HTML element content and double-quoted attributes.
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

/// Dropdown entries for the current search text. One `<li>` per match.
pub fn render_dropdown(state: &SelectorState) -> String {
    state
        .dropdown()
        .iter()
        .map(|item| {
            let name = escape_html(item.symptom.as_str());
            let class = if item.active {
                "dropdown-item active"
            } else {
                "dropdown-item"
            };
            format!(
                r#"<li><form method="post" action="/symptoms/toggle"><input type="hidden" name="symptom" value="{name}"><button type="submit" class="{class}" data-symptom="{name}">{name}</button></form></li>"#
            )
        })
        .collect()
}

/// Selected symptoms as removable chips, in insertion order.
pub fn render_chips(state: &SelectorState) -> String {
    state
        .selection()
        .iter()
        .map(|symptom| {
            let name = escape_html(symptom.as_str());
            format!(
                r#"<span class="badge" data-symptom="{name}">{name}<form method="post" action="/symptoms/remove"><input type="hidden" name="symptom" value="{name}"><button type="submit" class="btn-close" aria-label="Remove">&times;</button></form></span>"#
            )
        })
        .collect()
}

/// The results area: an alert, prediction cards, or nothing.
pub fn render_panel(panel: &ResultsPanel) -> String {
    if let ResultsPanel::Predictions { predictions } = panel {
        return predictions.iter().map(render_card).collect();
    }

    let Some((severity, message)) = panel.alert() else {
        return String::new();
    };

    let reload = if matches!(panel, ResultsPanel::LoadFailed { .. }) {
        r#"<form method="post" action="/vocabulary/reload"><button type="submit" class="btn btn-link">Reload symptoms</button></form>"#
    } else {
        ""
    };

    format!(
        r#"<div class="alert {class}" role="alert">{message}{reload}<form method="post" action="/panel/dismiss"><button type="submit" class="btn-close" aria-label="Dismiss">&times;</button></form></div>"#,
        class = severity_class(severity),
        message = escape_html(&message),
    )
}

fn severity_class(severity: Severity) -> &'static str {
    match severity {
        Severity::Info => "alert-info",
        Severity::Warning => "alert-warning",
        Severity::Danger => "alert-danger",
    }
}

/// One prediction card.
pub fn render_card(prediction: &Prediction) -> String {
    format!(
        r#"<div class="card"><div class="card-header"><h5>{disease}</h5><small class="text-muted">Match: {label}%</small></div><div class="card-body"><p class="card-text">{description}</p><h6>Precautions:</h6><ul>{precautions}</ul><h6>Medications:</h6><ul>{medications}</ul></div></div>"#,
        disease = escape_html(&prediction.disease),
        label = prediction.match_label(),
        description = escape_html(&prediction.description),
        precautions = render_list(&prediction.precautions),
        medications = render_list(&prediction.medications),
    )
}

fn render_list(items: &[String]) -> String {
    items
        .iter()
        .map(|item| format!("<li>{}</li>", escape_html(item)))
        .collect()
}

/// The complete page, re-derived from state on every request.
pub fn render_page(state: &SelectorState) -> String {
    let mut html = String::with_capacity(PAGE_HEAD.len() + PAGE_TAIL.len() + 4096);
    html.push_str(PAGE_HEAD);
    html.push_str(&format!(
        r#"<h1>{title}</h1>
<form method="post" action="/search/confirm" id="searchForm">
  <input type="text" id="symptomSearch" name="q" value="{search}" placeholder="Search symptoms..." autocomplete="off" autofocus>
</form>
<ul id="symptomsDropdown" class="dropdown">{dropdown}</ul>
<div id="selectedSymptoms" class="chips">{chips}</div>
<form method="post" action="/predict" id="predictionForm">
  <button type="submit" class="btn btn-primary">Predict Disease</button>
</form>
<div id="results">{results}</div>
"#,
        title = escape_html(APP_NAME),
        search = escape_html(state.search_text()),
        dropdown = render_dropdown(state),
        chips = render_chips(state),
        results = render_panel(state.panel()),
    ));
    html.push_str(PAGE_TAIL);
    html
}

// ---------------------------------------------------------------------------
// Page shell (self-contained, no external resources)
// ---------------------------------------------------------------------------

const PAGE_HEAD: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>Symptom Selector</title>
  <style>
    * { box-sizing: border-box; }
    body {
      font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', system-ui, sans-serif;
      background: #fafaf9; color: #1c1917; max-width: 720px; margin: 0 auto; padding: 24px;
    }
    form { display: inline; margin: 0; }
    #searchForm input {
      width: 100%; padding: 10px 12px; font-size: 16px;
      border: 1px solid #d6d3d1; border-radius: 8px;
    }
    .dropdown {
      list-style: none; padding: 0; margin: 8px 0; max-height: 240px; overflow-y: auto;
      border: 1px solid #e7e5e4; border-radius: 8px; background: white;
    }
    .dropdown-item {
      display: block; width: 100%; text-align: left; padding: 6px 12px;
      background: none; border: none; font-size: 15px; cursor: pointer;
    }
    .dropdown-item:hover { background: #f5f5f4; }
    .dropdown-item.active { background: #4a7c59; color: white; }
    .chips { margin: 12px 0; }
    .badge {
      display: inline-flex; align-items: center; gap: 4px; margin: 0 8px 8px 0;
      padding: 4px 4px 4px 10px; border-radius: 12px; background: #4a7c59; color: white;
    }
    .btn-close { background: none; border: none; color: inherit; cursor: pointer; font-size: 16px; }
    .btn { padding: 10px 16px; border-radius: 8px; border: none; cursor: pointer; font-size: 15px; }
    .btn-primary { background: #4a7c59; color: white; }
    .btn-link { background: none; color: inherit; text-decoration: underline; padding: 0 8px; }
    #results { margin-top: 24px; }
    .alert { display: flex; justify-content: space-between; align-items: center; padding: 12px 16px; border-radius: 8px; }
    .alert-info { background: #e0f2fe; color: #075985; }
    .alert-warning { background: #fef3c7; color: #92400e; }
    .alert-danger { background: #fee2e2; color: #991b1b; }
    .card { border: 1px solid #e7e5e4; border-radius: 8px; margin-bottom: 16px; background: white; }
    .card-header { padding: 12px 16px; border-bottom: 1px solid #e7e5e4; }
    .card-header h5 { margin: 0; font-size: 18px; }
    .card-body { padding: 12px 16px; }
    .text-muted { color: #78716c; }
  </style>
</head>
<body>
"#;

const PAGE_TAIL: &str = r#"<script>
  var search = document.getElementById('symptomSearch');
  var dropdown = document.getElementById('symptomsDropdown');
  var seq = 0;
  search.addEventListener('input', function() {
    // Date-based so a reloaded page still outruns the server's last seq.
    seq = Math.max(Date.now(), seq + 1);
    var mine = seq;
    fetch('/dropdown?q=' + encodeURIComponent(search.value) + '&seq=' + mine)
      .then(function(r) { return r.text(); })
      .then(function(html) {
        if (mine === seq) { dropdown.innerHTML = html; }
      })
      .catch(function(e) { console.error('Error filtering symptoms:', e); });
  });
</script>
</body>
</html>
"#;
