//! Azure Speech REST client.
//!
//! - TTS endpoint: `https://{region}.tts.speech.microsoft.com/cognitiveservices/v1`
//! - Voices endpoint: `https://{region}.tts.speech.microsoft.com/cognitiveservices/voices/list`
//! - Required headers: `Ocp-Apim-Subscription-Key`, `Content-Type: application/ssml+xml`,
//!   `X-Microsoft-OutputFormat`

use anyhow::{bail, Context, Result};
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::StatusCode;
use serde::Deserialize;
use std::time::Duration;

use crate::domain::traits::CloudSynthesizer;
use crate::domain::types::{AudioFormat, AzureCredentials, SpeechRate, Voice, Volume};

pub const SUBSCRIPTION_KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
pub const OUTPUT_FORMAT_HEADER: &str = "X-Microsoft-OutputFormat";
const SSML_CONTENT_TYPE: &str = "application/ssml+xml";
const DEFAULT_LANG: &str = "en-US";

/// Region names are interpolated into the host name, so only plain
/// identifiers like `westeurope` are accepted.
fn validate_region(region: &str) -> Result<()> {
    if region.is_empty()
        || !region
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
    {
        bail!(
            "Invalid Azure region: {:?} (expected something like \"westeurope\")",
            region
        );
    }
    Ok(())
}

pub fn tts_url(region: &str) -> String {
    format!("https://{}.tts.speech.microsoft.com/cognitiveservices/v1", region)
}

pub fn voices_url(region: &str) -> String {
    format!(
        "https://{}.tts.speech.microsoft.com/cognitiveservices/voices/list",
        region
    )
}

/// Escape text for use in XML content or attribute values.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Locale prefix of a neural voice name: `en-US-JennyNeural` -> `en-US`.
fn voice_locale(voice: &str) -> &str {
    let mut dashes = voice.match_indices('-').map(|(i, _)| i);
    match (dashes.next(), dashes.next()) {
        (Some(_), Some(second)) => &voice[..second],
        _ => DEFAULT_LANG,
    }
}

/// Wrap plain text in an SSML document for `voice`. A `<prosody>` element
/// is added only when rate or volume differ from the defaults.
pub fn build_ssml(text: &str, voice: &str, rate: SpeechRate, volume: Volume) -> String {
    let body = escape_xml(text);
    let body = if rate.is_default() && volume.is_default() {
        body
    } else {
        let mut attrs = String::new();
        if !rate.is_default() {
            attrs.push_str(&format!(" rate=\"{}\"", rate.ssml_percent()));
        }
        if !volume.is_default() {
            attrs.push_str(&format!(" volume=\"{}\"", volume.value()));
        }
        format!("<prosody{}>{}</prosody>", attrs, body)
    };

    format!(
        "<speak version=\"1.0\" xmlns=\"http://www.w3.org/2001/10/synthesis\" xml:lang=\"{}\">\
         <voice name=\"{}\">{}</voice></speak>",
        escape_xml(voice_locale(voice)),
        escape_xml(voice),
        body
    )
}

/// Entry of the voices list endpoint.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct AzureVoice {
    short_name: String,
    #[serde(default)]
    display_name: Option<String>,
    #[serde(default)]
    locale: String,
    #[serde(default)]
    gender: Option<String>,
}

impl From<AzureVoice> for Voice {
    fn from(v: AzureVoice) -> Self {
        Voice {
            name: v.display_name.unwrap_or_else(|| v.short_name.clone()),
            id: v.short_name,
            language: v.locale,
            gender: v.gender.map(|g| g.to_lowercase()),
        }
    }
}

pub fn parse_voice_list(json: &str) -> Result<Vec<Voice>> {
    let voices: Vec<AzureVoice> =
        serde_json::from_str(json).context("Failed to parse Azure voice list")?;
    Ok(voices.into_iter().map(Voice::from).collect())
}

/// Azure Speech client for one region/key pair.
#[derive(Debug)]
pub struct AzureClient {
    client: reqwest::Client,
    credentials: AzureCredentials,
}

impl AzureClient {
    pub fn new(credentials: AzureCredentials, timeout: Duration) -> Result<Self> {
        validate_region(&credentials.region)?;
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client")?;
        Ok(Self {
            client,
            credentials,
        })
    }

    fn user_agent() -> String {
        format!("readout/{}", env!("CARGO_PKG_VERSION"))
    }

    /// The synthesis request, built but not sent.
    pub fn synthesis_request(&self, ssml: &str, format: &AudioFormat) -> Result<reqwest::Request> {
        self.client
            .post(tts_url(&self.credentials.region))
            .header(SUBSCRIPTION_KEY_HEADER, &self.credentials.key)
            .header(CONTENT_TYPE, SSML_CONTENT_TYPE)
            .header(OUTPUT_FORMAT_HEADER, format.as_str())
            .header(USER_AGENT, Self::user_agent())
            .body(ssml.to_string())
            .build()
            .context("Failed to build Azure request")
    }

    pub fn voices_request(&self) -> Result<reqwest::Request> {
        self.client
            .get(voices_url(&self.credentials.region))
            .header(SUBSCRIPTION_KEY_HEADER, &self.credentials.key)
            .header(USER_AGENT, Self::user_agent())
            .build()
            .context("Failed to build Azure request")
    }

    async fn send(&self, request: reqwest::Request) -> Result<reqwest::Response> {
        let url = request.url().clone();
        tracing::debug!(%url, method = %request.method(), "sending Azure request");

        let response = self
            .client
            .execute(request)
            .await
            .with_context(|| format!("Failed to connect: {}", url))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let hint = match status {
                StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => {
                    " (check the Azure key and that it belongs to this region)"
                }
                StatusCode::BAD_REQUEST => " (check the SSML and the audio format)",
                _ => "",
            };
            bail!("Azure request failed: HTTP {}{} {}", status, hint, body.trim());
        }

        Ok(response)
    }
}

impl CloudSynthesizer for AzureClient {
    async fn voices(&self) -> Result<Vec<Voice>> {
        let response = self.send(self.voices_request()?).await?;
        let body = response
            .text()
            .await
            .context("Failed to read Azure voice list")?;
        parse_voice_list(&body)
    }

    async fn synthesize(&self, ssml: &str, format: &AudioFormat) -> Result<Vec<u8>> {
        let response = self.send(self.synthesis_request(ssml, format)?).await?;
        let bytes = response
            .bytes()
            .await
            .context("Failed to read Azure audio")?;
        tracing::debug!(bytes = bytes.len(), "received audio");
        Ok(bytes.to_vec())
    }
}
