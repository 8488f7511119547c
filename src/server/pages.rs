use crate::classifier::Prediction;
use crate::comparison::{ComparisonRecord, ComparisonSummary};

/// Minimal HTML escaping for values interpolated into pages.
pub fn escape(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn layout(title: &str, body: &str) -> String {
    format!(
        "<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
         </head>\n<body>\n<h1>{title}</h1>\n{body}\n</body>\n</html>\n",
        title = escape(title),
        body = body
    )
}

pub fn index_page(images: &[String], flash: Option<&str>) -> String {
    let mut body = String::new();
    if let Some(message) = flash {
        body.push_str(&format!("<p class=\"flash\">{}</p>\n", escape(message)));
    }
    body.push_str(
        "<form method=\"post\" enctype=\"multipart/form-data\">\n\
         <input type=\"file\" name=\"image\">\n\
         <input type=\"submit\" value=\"Classify\">\n\
         </form>\n",
    );
    if images.is_empty() {
        body.push_str("<p>No uploads yet.</p>\n");
    } else {
        body.push_str("<ul>\n");
        for image in images {
            let name = escape(image);
            body.push_str(&format!(
                "<li><a href=\"/classify/{name}\">{name}</a></li>\n",
                name = name
            ));
        }
        body.push_str("</ul>\n");
        body.push_str("<p><a href=\"/clear-uploads/\">Clear uploads</a></p>\n");
    }
    layout("ColorSeason", &body)
}

pub fn classify_page(filename: &str, prediction: &Prediction) -> String {
    let mut body = format!(
        "<p><img src=\"/uploads/{name}\" alt=\"{name}\" width=\"300\"></p>\n\
         <p>Predicted class: <strong>{label}</strong> \
         (id {id}, probability {probability:.4})</p>\n",
        name = escape(filename),
        label = escape(&prediction.class_label),
        id = prediction.class_id,
        probability = prediction.class_probability,
    );
    body.push_str("<table border=\"1\">\n<tr><th>Probability</th><th>Label</th></tr>\n");
    for (probability, label) in &prediction.top_inds {
        body.push_str(&format!(
            "<tr><td>{:.4}</td><td>{}</td></tr>\n",
            probability,
            escape(label)
        ));
    }
    body.push_str("</table>\n<p><a href=\"/\">Back</a></p>\n");
    layout("Classification result", &body)
}

pub fn comparison_page(records: &[ComparisonRecord], summary: &ComparisonSummary) -> String {
    let mut body = format!(
        "<p>Total: {total} &mdash; train: {train}, test: {test} &mdash; \
         true: {correct}, false: {incorrect}</p>\n",
        total = summary.total,
        train = summary.train,
        test = summary.test,
        correct = summary.correct,
        incorrect = summary.incorrect,
    );
    body.push_str(
        "<table border=\"1\">\n<tr><th>Phase</th><th>File</th><th>Origin</th>\
         <th>Status</th><th>Defined</th><th>Probability</th><th>Processed</th></tr>\n",
    );
    for record in records {
        body.push_str(&format!(
            "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td>\
             <td>{:.4}</td><td>{}</td></tr>\n",
            escape(&record.phase),
            escape(&record.filename),
            record.origin_class,
            escape(&record.status),
            record.defined_class,
            record.defined_probability,
            escape(&record.time_processed),
        ));
    }
    body.push_str("</table>\n");
    layout("Comparison results", &body)
}

pub const TEST_API_PAGE: &str = "<!doctype html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n\
<title>API test</title>\n</head>\n<body>\n<h1>API test</h1>\n\
<form id=\"f\">\n<input type=\"file\" name=\"image\">\n\
<input type=\"submit\" value=\"Classify\">\n</form>\n<pre id=\"out\"></pre>\n\
<script>\n\
document.getElementById('f').addEventListener('submit', async (e) => {\n\
  e.preventDefault();\n\
  const data = new FormData(e.target);\n\
  const response = await fetch('/api/1.0/classify/', { method: 'POST', body: data });\n\
  document.getElementById('out').textContent = JSON.stringify(await response.json(), null, 2);\n\
});\n\
</script>\n</body>\n</html>\n";
