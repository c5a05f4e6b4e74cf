//! Export of generated IBANs as text, CSV, JSON or XML documents.

use crate::config::IbanConfig;
use crate::error::IbanError;
use crate::util::{format_iban, slugify};
use crate::validation::iban_info;

use chrono::{DateTime, SecondsFormat, Utc};
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::Serialize;
use std::path::Path;

const EXPORT_VERSION: &str = "1.0";
const UNKNOWN_COUNTRY: &str = "Unknown";
const RANDOM_BANK: &str = "Random";

#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ExportFormat {
    #[value(alias = "txt")]
    Text,
    Csv,
    Json,
    Xml,
}

impl ExportFormat {
    pub fn extension(self) -> &'static str {
        match self {
            Self::Text => "txt",
            Self::Csv => "csv",
            Self::Json => "json",
            Self::Xml => "xml",
        }
    }
}

/// What the exported IBANs were generated for.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExportMetadata {
    pub country: Option<String>,
    /// Bank display name; `None` for random bank codes.
    pub bank: Option<String>,
    pub quantity: Option<usize>,
    pub generated_at: Option<DateTime<Utc>>,
}

impl ExportMetadata {
    fn country_label(&self) -> &str {
        self.country.as_deref().unwrap_or(UNKNOWN_COUNTRY)
    }

    fn bank_label(&self) -> &str {
        self.bank.as_deref().unwrap_or(RANDOM_BANK)
    }
}

/// Per-IBAN breakdown shared by the JSON and XML documents.
#[derive(Debug, Serialize)]
struct IbanRecord {
    iban: String,
    formatted: String,
    country: String,
    bank_code: String,
    account_number: String,
    check_digits: String,
}

#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    #[serde(rename = "IBAN")]
    iban: &'a str,
    #[serde(rename = "Country")]
    country: String,
    #[serde(rename = "Bank")]
    bank: &'a str,
    #[serde(rename = "Generated_At")]
    generated_at: &'a str,
}

#[derive(Debug, Serialize)]
struct ExportInfo {
    generated_at: String,
    total_ibans: usize,
    format: &'static str,
    version: &'static str,
}

#[derive(Debug, Serialize)]
struct JsonMetadata<'a> {
    country: &'a str,
    bank: &'a str,
    generation_timestamp: Option<String>,
}

#[derive(Debug, Serialize)]
struct JsonDocument<'a> {
    export_info: ExportInfo,
    metadata: JsonMetadata<'a>,
    ibans: Vec<IbanRecord>,
}

fn timestamp(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

fn export_err(err: impl std::fmt::Display) -> IbanError {
    IbanError::Export {
        detail: err.to_string(),
    }
}

pub struct IbanExport<'a> {
    config: &'a IbanConfig,
    ibans: &'a [String],
    metadata: ExportMetadata,
    exported_at: DateTime<Utc>,
}

impl<'a> IbanExport<'a> {
    pub fn new(config: &'a IbanConfig, ibans: &'a [String], metadata: ExportMetadata) -> Self {
        Self {
            config,
            ibans,
            metadata,
            exported_at: Utc::now(),
        }
    }

    /// Pins the export timestamp instead of using the current time.
    pub fn exported_at(mut self, at: DateTime<Utc>) -> Self {
        self.exported_at = at;
        self
    }

    pub fn render(&self, format: ExportFormat) -> Result<String, IbanError> {
        match format {
            ExportFormat::Text => Ok(self.to_text()),
            ExportFormat::Csv => self.to_csv(),
            ExportFormat::Json => self.to_json(),
            ExportFormat::Xml => self.to_xml(),
        }
    }

    /// `iban-export-<country>[-<bank>]-YYYY-MM-DD.<ext>`
    pub fn filename(&self, format: ExportFormat) -> String {
        let country = self.metadata.country.as_deref().unwrap_or("mixed");
        let bank = self
            .metadata
            .bank
            .as_deref()
            .map(slugify)
            .filter(|slug| !slug.is_empty())
            .map(|slug| format!("-{slug}"))
            .unwrap_or_default();
        format!(
            "iban-export-{}{}-{}.{}",
            country,
            bank,
            self.exported_at.format("%Y-%m-%d"),
            format.extension()
        )
    }

    pub fn write_to(&self, path: &Path, format: ExportFormat) -> Result<(), IbanError> {
        let content = self.render(format)?;
        std::fs::write(path, content)
            .map_err(|err| export_err(format!("{}: {}", path.display(), err)))?;
        log::info!(
            "wrote {} IBANs as {} to {}",
            self.ibans.len(),
            format.extension(),
            path.display()
        );
        Ok(())
    }

    fn record(&self, iban: &str) -> IbanRecord {
        let (bank_code, account_number) = match iban_info(self.config, iban) {
            Ok(info) => (info.bank_code, info.account_number),
            Err(err) => {
                log::debug!("no breakdown for exported IBAN {iban}: {err}");
                (String::new(), String::new())
            }
        };
        IbanRecord {
            iban: iban.to_string(),
            formatted: format_iban(iban),
            country: iban.chars().take(2).collect(),
            bank_code,
            account_number,
            check_digits: iban.chars().skip(2).take(2).collect(),
        }
    }

    pub fn to_text(&self) -> String {
        let mut text = format!(
            "IBAN Export - Generated at {}\n",
            timestamp(&self.exported_at)
        );
        text.push_str(&"=".repeat(49));
        text.push_str("\n\n");

        let meta = &self.metadata;
        if *meta != ExportMetadata::default() {
            text.push_str("Metadata:\n");
            text.push_str(&format!("- Country: {}\n", meta.country_label()));
            text.push_str(&format!("- Bank: {}\n", meta.bank_label()));
            text.push_str(&format!(
                "- Quantity: {}\n",
                meta.quantity.unwrap_or(self.ibans.len())
            ));
            if let Some(at) = &meta.generated_at {
                text.push_str(&format!("- Generated: {}\n", timestamp(at)));
            }
            text.push('\n');
        }

        text.push_str(&format!("Generated IBANs ({}):\n", self.ibans.len()));
        text.push_str(&"-".repeat(30));
        text.push('\n');
        for (idx, iban) in self.ibans.iter().enumerate() {
            text.push_str(&format!("{}. {}\n", idx + 1, format_iban(iban)));
        }
        text
    }

    pub fn to_csv(&self) -> Result<String, IbanError> {
        let generated_at = timestamp(self.metadata.generated_at.as_ref().unwrap_or(&self.exported_at));
        let mut writer = csv::WriterBuilder::new()
            .terminator(csv::Terminator::Any(b'\n'))
            .from_writer(Vec::new());

        if self.ibans.is_empty() {
            writer
                .write_record(["IBAN", "Country", "Bank", "Generated_At"])
                .map_err(export_err)?;
        }
        for iban in self.ibans {
            writer
                .serialize(CsvRow {
                    iban,
                    country: iban.chars().take(2).collect(),
                    bank: self.metadata.bank_label(),
                    generated_at: &generated_at,
                })
                .map_err(export_err)?;
        }

        let bytes = writer.into_inner().map_err(export_err)?;
        String::from_utf8(bytes).map_err(export_err)
    }

    pub fn to_json(&self) -> Result<String, IbanError> {
        let document = JsonDocument {
            export_info: ExportInfo {
                generated_at: timestamp(&self.exported_at),
                total_ibans: self.ibans.len(),
                format: "json",
                version: EXPORT_VERSION,
            },
            metadata: JsonMetadata {
                country: self.metadata.country_label(),
                bank: self.metadata.bank_label(),
                generation_timestamp: self.metadata.generated_at.as_ref().map(timestamp),
            },
            ibans: self.ibans.iter().map(|iban| self.record(iban)).collect(),
        };
        serde_json::to_string_pretty(&document).map_err(export_err)
    }

    pub fn to_xml(&self) -> Result<String, IbanError> {
        let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(export_err)?;
        write_start(&mut writer, "iban_export")?;

        write_start(&mut writer, "export_info")?;
        write_text_element(&mut writer, "generated_at", &timestamp(&self.exported_at))?;
        write_text_element(&mut writer, "total_ibans", &self.ibans.len().to_string())?;
        write_text_element(&mut writer, "format", "xml")?;
        write_text_element(&mut writer, "version", EXPORT_VERSION)?;
        write_end(&mut writer, "export_info")?;

        write_start(&mut writer, "metadata")?;
        write_text_element(&mut writer, "country", self.metadata.country_label())?;
        write_text_element(&mut writer, "bank", self.metadata.bank_label())?;
        if let Some(at) = &self.metadata.generated_at {
            write_text_element(&mut writer, "generation_timestamp", &timestamp(at))?;
        }
        write_end(&mut writer, "metadata")?;

        write_start(&mut writer, "ibans")?;
        for iban in self.ibans {
            let record = self.record(iban);
            write_start(&mut writer, "iban")?;
            write_text_element(&mut writer, "value", &record.iban)?;
            write_text_element(&mut writer, "formatted", &record.formatted)?;
            write_text_element(&mut writer, "country", &record.country)?;
            write_text_element(&mut writer, "bank_code", &record.bank_code)?;
            write_text_element(&mut writer, "account_number", &record.account_number)?;
            write_text_element(&mut writer, "check_digits", &record.check_digits)?;
            write_end(&mut writer, "iban")?;
        }
        write_end(&mut writer, "ibans")?;

        write_end(&mut writer, "iban_export")?;
        String::from_utf8(writer.into_inner()).map_err(export_err)
    }
}

fn write_start<W: std::io::Write>(writer: &mut Writer<W>, name: &str) -> Result<(), IbanError> {
    writer
        .write_event(Event::Start(BytesStart::new(name)))
        .map_err(export_err)
}

fn write_end<W: std::io::Write>(writer: &mut Writer<W>, name: &str) -> Result<(), IbanError> {
    writer
        .write_event(Event::End(BytesEnd::new(name)))
        .map_err(export_err)
}

fn write_text_element<W: std::io::Write>(
    writer: &mut Writer<W>,
    name: &str,
    text: &str,
) -> Result<(), IbanError> {
    write_start(writer, name)?;
    writer
        .write_event(Event::Text(BytesText::new(text)))
        .map_err(export_err)?;
    write_end(writer, name)
}
