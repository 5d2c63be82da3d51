pub mod status;

use crate::app::error::{Error, Result};
use crate::app::group::{ReportGroup, Tally};
use crate::configuration::server_info::ServerInfo;
use crate::configuration::size::IndicatorSize;
use derivative::Derivative;
use liquid::model::Value;
use liquid::Template;
use serde_derive::Serialize;
use std::io::Write;
use std::path::Path;

const REPORT_TEMPLATE: &str = include_str!("template/report.html.liquid");
const REPORT_SCRIPT: &str = include_str!("template/report.js");

/// Everything the HTML template binds.
#[derive(Debug, Clone, Serialize)]
pub struct ReportSummary {
    pub title: String,
    pub indicator_width: String,
    pub indicator_height: String,
    pub num_tests: usize,
    pub num_passed: usize,
    pub num_failed: usize,
    pub num_skipped: usize,
    pub test_duration: String,
    pub execution_date: String,
    pub input_filename: String,
    pub output_filename: String,
    pub server_info: Vec<ServerInfo>,
    pub groups: Vec<ReportGroup>,
}

impl ReportSummary {
    pub fn new(title: &str, size: IndicatorSize, groups: Vec<ReportGroup>, tally: &Tally) -> Self {
        Self {
            title: title.to_owned(),
            indicator_width: size.width_px(),
            indicator_height: size.height_px(),
            num_tests: tally.total(),
            num_passed: tally.pass,
            num_failed: tally.fail,
            num_skipped: tally.skip,
            test_duration: String::new(),
            execution_date: String::new(),
            input_filename: String::new(),
            output_filename: String::new(),
            server_info: Vec::new(),
            groups,
        }
    }
}

#[derive(Derivative)]
#[derivative(Debug)]
pub struct Renderer {
    #[derivative(Debug = "ignore")]
    template: Template,
}

impl Renderer {
    pub fn new() -> Result<Self> {
        Self::from_source(REPORT_TEMPLATE)
    }

    fn from_source(source: &str) -> Result<Self> {
        let parser = liquid::ParserBuilder::with_stdlib().build()?;
        let template = parser.parse(source)?;
        Ok(Self { template })
    }

    pub fn render<W: Write>(&self, summary: &ReportSummary, writer: &mut W) -> Result<()> {
        let mut globals = liquid::to_object(summary)?;
        globals.insert("js_code".into(), Value::scalar(REPORT_SCRIPT));
        globals.insert(
            "report_data".into(),
            Value::scalar(script_json(&summary.groups)?),
        );
        self.template.render_to(writer, &globals)?;
        Ok(())
    }

    /// Renders in memory first; the file is only touched once rendering succeeded.
    pub fn render_to_file(&self, summary: &ReportSummary, path: &Path) -> Result<()> {
        let mut html = Vec::new();
        self.render(summary, &mut html)?;
        std::fs::write(path, html).map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Report written to {}", path.display());
        Ok(())
    }
}

/// JSON that is safe to place inside a `<script>` element.
fn script_json<T: serde::Serialize>(data: &T) -> Result<String> {
    let json = serde_json::to_string(data)?;
    Ok(json.replace("</", "<\\/").replace("<!--", "<\\!--"))
}
