use std::path::Path;

use axum::response::Html;
use axum::routing::{get, post};
use axum::Router;
use tower_http::trace::TraceLayer;

use crate::server::api;
use crate::server::static_files;
use crate::server::AppState;

/// Build the application router.
///
/// `/api/*` is always JSON (unknown API paths get a JSON 404). Everything else is the
/// built notebook from `static_dir` when one is configured, or a small landing page.
pub fn router(state: AppState, static_dir: Option<&Path>) -> Router {
    let api_routes = Router::new()
        .route("/health", get(api::health))
        .route("/effects", get(api::effects))
        .route("/characters", get(api::characters))
        .route("/calculate", post(api::calculate_recovery))
        .route("/recovery/table", get(api::recovery_table))
        .fallback(api::route_not_found);

    let app = Router::new().nest("/api", api_routes);
    let app = match static_dir {
        Some(dir) => app.fallback_service(static_files::spa_service(dir)),
        None => app
            .route("/", get(landing_page))
            .fallback(api::route_not_found),
    };

    app.layer(TraceLayer::new_for_http()).with_state(state)
}

async fn landing_page() -> Html<&'static str> {
    Html(LANDING_HTML)
}

const LANDING_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width,initial-scale=1" />
  <title>Quickref Recovery Console</title>
  <style>
    body { font-family: Arial, sans-serif; max-width: 900px; margin: 24px auto; padding: 0 12px; }
    .card { border: 1px solid #ddd; border-radius: 8px; padding: 14px; margin: 14px 0; }
    label { display:block; margin: 8px 0 4px; font-weight: 600; }
    input { width: 100%; padding: 8px; box-sizing: border-box; }
    button { margin-top: 12px; padding: 8px 14px; }
    pre { background: #111; color: #aef2ae; padding: 12px; overflow: auto; border-radius: 6px; min-height: 180px; }
  </style>
</head>
<body>
  <h1>Quickref Local API</h1>
  <p>The notebook frontend is not built; this console talks to the JSON API directly.</p>

  <div class="card">
    <strong>Recovery calculator</strong>
    <label for="character">Character</label>
    <input id="character" />
    <label for="ally">Ally (optional)</label>
    <input id="ally" />
    <label for="effects">Effect ids (comma separated)</label>
    <input id="effects" value="3,6" />
    <div><button id="calculate-btn">POST /api/calculate</button></div>
  </div>

  <pre id="output">Ready.</pre>

  <script>
    const output = document.getElementById('output');
    document.getElementById('calculate-btn').addEventListener('click', async () => {
      const effects = document.getElementById('effects').value
        .split(',').map(v => Number(v.trim())).filter(v => Number.isInteger(v) && v > 0);
      const payload = {
        character: document.getElementById('character').value,
        ally: document.getElementById('ally').value || null,
        effects,
      };
      const response = await fetch('/api/calculate', {
        method: 'POST',
        headers: { 'Content-Type': 'application/json' },
        body: JSON.stringify(payload),
      });
      output.textContent = 'HTTP ' + response.status + '\n' + await response.text();
    });
  </script>
</body>
</html>
"#;
