use serde::{Deserialize, Serialize};

const DEFAULT_MAIL_TEMPLATE: &str = "openstack_integration.email_template_openstack_invoice";
const DEFAULT_ATTACHMENT_PREFIX: &str = "Detail_";
const DEFAULT_FALLBACK_NAME: &str = "INV";
const DEFAULT_REPORT_FILENAME: &str = "OpenStack Invoice CSV";

/// Names used when rendering and mailing invoice reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportingConfig {
    pub invoice_mail_template: String,
    /// Prefix of the CSV attachment filename.
    pub detail_attachment_prefix: String,
    /// Used in the attachment filename when the invoice has no usable name.
    pub fallback_invoice_name: String,
    pub default_report_filename: String,
}

impl Default for ReportingConfig {
    fn default() -> Self {
        Self {
            invoice_mail_template: DEFAULT_MAIL_TEMPLATE.to_string(),
            detail_attachment_prefix: DEFAULT_ATTACHMENT_PREFIX.to_string(),
            fallback_invoice_name: DEFAULT_FALLBACK_NAME.to_string(),
            default_report_filename: DEFAULT_REPORT_FILENAME.to_string(),
        }
    }
}

impl ReportingConfig {
    /// Read `OSBILL_*` environment variables, defaulting the unset ones.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let read = |key: &str, default: &str| {
            lookup(key).unwrap_or_else(|| {
                tracing::warn!(key, default, "reporting setting not set; using default");
                default.to_string()
            })
        };

        Self {
            invoice_mail_template: read("OSBILL_INVOICE_MAIL_TEMPLATE", DEFAULT_MAIL_TEMPLATE),
            detail_attachment_prefix: read(
                "OSBILL_DETAIL_ATTACHMENT_PREFIX",
                DEFAULT_ATTACHMENT_PREFIX,
            ),
            fallback_invoice_name: read("OSBILL_FALLBACK_INVOICE_NAME", DEFAULT_FALLBACK_NAME),
            default_report_filename: read(
                "OSBILL_DEFAULT_REPORT_FILENAME",
                DEFAULT_REPORT_FILENAME,
            ),
        }
    }
}
