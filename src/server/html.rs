use crate::domain::model::{RainPeriod, UmbrellaVerdict};

const BAR_WIDTH: usize = 30;
const BAR_GAP: usize = 10;
const CHART_HEIGHT: usize = 80;
// 10mm 即滿格
const FULL_SCALE_MM: f64 = 10.0;

const PAGE_STYLE: &str = r#"
    body {
        font-family: -apple-system, BlinkMacSystemFont, 'Segoe UI', Roboto, sans-serif;
        display: flex;
        justify-content: center;
        align-items: center;
        min-height: 100vh;
        margin: 0;
        background: linear-gradient(135deg, #667eea 0%, #764ba2 100%);
    }
    .card {
        background: white;
        border-radius: 20px;
        padding: 3rem;
        box-shadow: 0 20px 60px rgba(0,0,0,0.3);
        text-align: center;
        max-width: 400px;
    }
    .icon { font-size: 5rem; margin-bottom: 1rem; }
    h1 { margin: 0 0 0.5rem 0; color: #333; font-size: 2rem; }
    .stats { font-size: 1.5rem; font-weight: bold; margin: 1rem 0; }
    .info { color: #666; font-size: 1rem; margin-top: 1rem; line-height: 1.5; }
    .chart-labels, .x-labels {
        display: flex;
        justify-content: center;
        color: #333;
    }
    .chart-labels { gap: 1.5rem; font-size: 0.95rem; margin-bottom: 0.5rem; }
    .x-labels { gap: 18px; font-size: 0.85rem; margin-top: 0.2rem; }
"#;

// 客戶端以瀏覽器時區顯示 x 軸時間
const LABEL_SCRIPT: &str = r#"
    const container = document.getElementById('xlabels');
    if (container) {
        startTimes.forEach((ts) => {
            const span = document.createElement('span');
            span.textContent = new Date(ts).toLocaleString(undefined, { hour: '2-digit' });
            container.appendChild(span);
        });
    }
"#;

/// Renders the verdict card with a likelihood/volume bar chart.
pub fn render_page(verdict: &UmbrellaVerdict) -> String {
    let (color, icon, title, info) = if verdict.need_umbrella {
        ("#e74c3c", "☔", "Take an umbrella!", "High likelihood and volume of rain")
    } else {
        ("#27ae60", "☀️", "No umbrella needed", "Low likelihood or volume of rain")
    };

    format!(
        r#"<!DOCTYPE html>
<html>
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Umbrella Check</title>
<style>{style}</style>
</head>
<body>
<div class="card">
<div class="icon">{icon}</div>
<h1>{title}</h1>
<div class="stats" style="color: {color};">{chance}% chance · {volume:.1}mm</div>
<div class="chart-labels"><span>Likelihood</span><span>Volume</span></div>
{chart}
<div id="xlabels" class="x-labels"></div>
<div class="info">{info}<br>{location}</div>
</div>
<script>
const startTimes = {start_times};
{script}
</script>
</body>
</html>"#,
        style = PAGE_STYLE,
        icon = icon,
        title = title,
        color = color,
        chance = verdict.precipitation_chance_percent,
        volume = verdict.precipitation_volume_max_mm,
        chart = render_chart(&verdict.periods),
        info = info,
        location = escape_html(&verdict.location),
        start_times = start_times_js(&verdict.periods),
        script = LABEL_SCRIPT,
    )
}

fn render_chart(periods: &[RainPeriod]) -> String {
    let chart_width = (periods.len() * (BAR_WIDTH + BAR_GAP)).saturating_sub(BAR_GAP);
    let half = BAR_WIDTH / 2 - 2;

    let mut bars = String::new();
    for (i, period) in periods.iter().enumerate() {
        let likelihood_height = bar_height(f64::from(period.likelihood) / 100.0);
        let volume_height = bar_height(period.volume / FULL_SCALE_MM);
        let x = i * (BAR_WIDTH + BAR_GAP);

        bars.push_str(&format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"#3498db\" rx=\"4\"/>\n",
            x,
            CHART_HEIGHT - likelihood_height,
            half,
            likelihood_height
        ));
        bars.push_str(&format!(
            "<rect x=\"{}\" y=\"{}\" width=\"{}\" height=\"{}\" fill=\"#888\" rx=\"4\"/>\n",
            x + BAR_WIDTH / 2 + 2,
            CHART_HEIGHT - volume_height,
            half,
            volume_height
        ));
    }

    format!(
        "<svg width=\"{}\" height=\"{}\" style=\"margin:1rem 0 0.5rem 0;\">{}</svg>",
        chart_width,
        CHART_HEIGHT + 20,
        bars
    )
}

// 超出範圍的比例截斷在 0..=1，避免 SVG 出現負值
fn bar_height(fraction: f64) -> usize {
    (CHART_HEIGHT as f64 * fraction.clamp(0.0, 1.0)) as usize
}

fn start_times_js(periods: &[RainPeriod]) -> String {
    let times: Vec<&str> = periods
        .iter()
        .map(|p| p.start_time.as_str())
        .filter(|t| !t.is_empty())
        .collect();
    // serde_json 產生的字串本身就是合法 JS；再跳脫 `</` 以免提早結束 <script>
    serde_json::to_string(&times)
        .unwrap_or_else(|_| "[]".to_string())
        .replace("</", "<\\/")
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
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
