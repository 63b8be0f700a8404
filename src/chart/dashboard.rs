//! Browser page for the interactive variant. The page draws the figure from
//! `/api/figure`, and every slider movement goes over `/ws` to the server,
//! which answers with a `display_update`.

pub const DASHBOARD_HTML: &str = r#"<!doctype html>
<html lang="en">
<head>
  <meta charset="utf-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1" />
  <title>Covered Call vs Buy &amp; Hold</title>
  <script src="https://cdn.plot.ly/plotly-2.35.2.min.js"></script>
  <style>
    body { margin: 0; font-family: sans-serif; background: #f7f9fb; color: #1d2733; }
    main { display: grid; grid-template-rows: auto 1fr auto; height: 100vh; }
    #summary {
      margin: 12px 16px 0; padding: 10px 14px; white-space: pre-wrap;
      background: aliceblue; border: 1px solid #9cb7d1; border-radius: 6px; font-size: 14px;
    }
    #chart { min-height: 520px; }
    .control { display: flex; align-items: center; gap: 12px; padding: 12px 16px 20px; }
    .control label { white-space: nowrap; font-weight: 600; }
    .control input[type=range] { flex: 1; }
    #price-label { min-width: 90px; text-align: right; font-variant-numeric: tabular-nums; }
    #status { font-size: 12px; color: #6b7a8a; }
  </style>
</head>
<body>
  <main>
    <div id="summary">loading...</div>
    <div id="chart"></div>
    <div class="control">
      <label for="price">Drag me! Expiration price</label>
      <input id="price" type="range" />
      <span id="price-label">-</span>
      <span id="status">connecting</span>
    </div>
  </main>
  <script>
    const summaryEl = document.getElementById('summary');
    const slider = document.getElementById('price');
    const priceLabel = document.getElementById('price-label');
    const statusEl = document.getElementById('status');
    let traces = null;
    let socket = null;

    function applyUpdate(update) {
      summaryEl.textContent = update.summary;
      priceLabel.textContent = '$' + update.price.toFixed(2);
      Plotly.restyle('chart', { x: [[update.price]], y: [[update.covered_call_profit]] }, [traces.cc_marker]);
      Plotly.restyle('chart', { x: [[update.price]], y: [[update.buy_and_hold_profit]] }, [traces.bh_marker]);
    }

    function connect() {
      const protocol = location.protocol === 'https:' ? 'wss' : 'ws';
      socket = new WebSocket(`${protocol}://${location.host}/ws`);
      socket.onopen = () => { statusEl.textContent = 'live'; };
      socket.onmessage = (event) => {
        try {
          const msg = JSON.parse(event.data);
          if (msg.type === 'display_update') applyUpdate(msg);
          else if (msg.type === 'error') statusEl.textContent = msg.reason;
        } catch (_) {}
      };
      socket.onerror = () => { statusEl.textContent = 'ws error'; };
      socket.onclose = () => { statusEl.textContent = 'disconnected'; };
    }

    slider.addEventListener('input', () => {
      if (socket && socket.readyState === WebSocket.OPEN) {
        socket.send(JSON.stringify({ type: 'price_changed', price: Number(slider.value) }));
      }
    });

    async function init() {
      const [scenario, figure] = await Promise.all([
        fetch('/api/scenario').then((r) => r.json()),
        fetch('/api/figure').then((r) => r.json()),
      ]);
      traces = scenario.traces;
      slider.min = scenario.slider.min;
      slider.max = scenario.slider.max;
      slider.step = scenario.slider.step;
      slider.value = scenario.scenario.evaluation_price;
      await Plotly.newPlot('chart', figure.data, figure.layout, { responsive: true });
      connect();
    }

    init().catch((err) => { statusEl.textContent = 'failed to load: ' + err; });
  </script>
</body>
</html>
"#;
