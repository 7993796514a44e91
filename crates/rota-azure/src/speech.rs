//! Azure Speech text-to-speech client.

use async_trait::async_trait;
use tracing::{debug, warn};

use rota_chat::{SpeechClient, VoiceInfo};
use rota_core::config::AzureSpeechConfig;

/// Slightly slower than default reads better for clinical content.
const PROSODY_RATE: &str = "0.95";
const OUTPUT_FORMAT: &str = "audio-16khz-128kbitrate-mono-mp3";

/// TTS client over the Azure Speech regional endpoint.
pub struct AzureSpeech {
    http: reqwest::Client,
    api_key: Option<String>,
    region: String,
    voice: String,
}

impl AzureSpeech {
    pub fn new(config: &AzureSpeechConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: config.api_key.clone(),
            region: config.region.clone(),
            voice: config.voice.clone(),
        }
    }

    /// Build from config with `AZURE_SPEECH_API_KEY` overriding the file.
    pub fn from_config_and_env(config: &AzureSpeechConfig) -> Self {
        let mut client = Self::new(config);
        if let Ok(api_key) = std::env::var("AZURE_SPEECH_API_KEY") {
            client.api_key = Some(api_key);
        }
        client
    }

    fn endpoint(&self) -> String {
        format!(
            "https://{}.tts.speech.microsoft.com/cognitiveservices/v1",
            self.region
        )
    }

    fn ssml(&self, text: &str) -> String {
        format!(
            "<speak version='1.0' xml:lang='en-GB'>\
<voice xml:lang='en-GB' name='{}'>\
<prosody rate='{}'>{}</prosody>\
</voice>\
</speak>",
            self.voice,
            PROSODY_RATE,
            escape_xml(text)
        )
    }
}

#[async_trait]
impl SpeechClient for AzureSpeech {
    fn is_ready(&self) -> bool {
        self.api_key.is_some()
    }

    fn voice_info(&self) -> VoiceInfo {
        VoiceInfo {
            configured: self.is_ready(),
            voice: self.voice.clone(),
        }
    }

    /// Any failure yields `None`; speech is strictly best-effort.
    async fn synthesize(&self, text: &str) -> Option<Vec<u8>> {
        let api_key = self.api_key.as_deref()?;

        debug!(voice = %self.voice, region = %self.region, "synthesizing speech");
        let response = match self
            .http
            .post(self.endpoint())
            .header("Ocp-Apim-Subscription-Key", api_key)
            .header("Content-Type", "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", OUTPUT_FORMAT)
            .body(self.ssml(text))
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                warn!(error = %e, "speech request failed");
                return None;
            }
        };

        if !response.status().is_success() {
            warn!(status = %response.status(), "speech synthesis rejected");
            return None;
        }

        match response.bytes().await {
            Ok(bytes) => Some(bytes.to_vec()),
            Err(e) => {
                warn!(error = %e, "failed to read speech audio");
                None
            }
        }
    }
}

/// Escape the five XML special characters for SSML embedding.
fn escape_xml(text: &str) -> String {
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
