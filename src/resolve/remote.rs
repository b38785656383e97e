//! Tier 3: online translation providers.

use md5::{Digest, Md5};
use rand::Rng;
use reqwest::blocking::Client;
use serde_json::Value;
use tracing::{debug, warn};

use super::NameResolver;
use crate::error::{PipelineError, Result};

const YOUDAO_URL: &str = "http://fanyi.youdao.com/translate";
const BAIDU_URL: &str = "https://fanyi-api.baidu.com/api/trans/vip/translate";
const GOOGLE_URL: &str = "https://translate.googleapis.com/translate_a/single";

/// English -> Chinese text translation.
pub trait Translator {
    fn provider(&self) -> &'static str;
    fn translate(&self, text: &str) -> Result<String>;
}

/// Wraps a provider so failures degrade to "unresolved".
pub struct RemoteLookup {
    translator: Box<dyn Translator>,
}

impl RemoteLookup {
    pub fn new(translator: Box<dyn Translator>) -> Self {
        RemoteLookup { translator }
    }
}

impl NameResolver for RemoteLookup {
    fn tier(&self) -> &'static str {
        "remote"
    }

    fn is_remote(&self) -> bool {
        true
    }

    fn resolve(&self, title: &str) -> Option<String> {
        match self.translator.translate(title) {
            Ok(text) if !text.trim().is_empty() => {
                debug!("{} translated {:?}", self.translator.provider(), title);
                Some(text.trim().to_string())
            }
            Ok(_) => {
                warn!("{} returned an empty translation for {:?}", self.translator.provider(), title);
                None
            }
            Err(e) => {
                warn!("{} lookup failed for {:?}: {}", self.translator.provider(), title, e);
                None
            }
        }
    }
}

fn no_result(provider: &'static str, body: &Value) -> PipelineError {
    PipelineError::Provider {
        provider,
        details: body.to_string(),
    }
}

/// Free web endpoint, no credentials.
pub struct Youdao {
    client: Client,
}

impl Youdao {
    pub fn new(client: Client) -> Self {
        Youdao { client }
    }
}

impl Translator for Youdao {
    fn provider(&self) -> &'static str {
        "youdao"
    }

    fn translate(&self, text: &str) -> Result<String> {
        let body: Value = self
            .client
            .post(YOUDAO_URL)
            .form(&[
                ("type", "AUTO"),
                ("i", text),
                ("doctype", "json"),
                ("version", "2.1"),
                ("keyfrom", "fanyi.web"),
                ("ue", "UTF-8"),
                ("action", "FY_BY_CLICKBUTTON"),
                ("typoResult", "true"),
            ])
            .send()?
            .error_for_status()?
            .json()?;
        parse_youdao(&body).ok_or_else(|| no_result(self.provider(), &body))
    }
}

/// `translateResult[0]` holds one segment per sentence.
pub fn parse_youdao(body: &Value) -> Option<String> {
    let segments = body.get("translateResult")?.get(0)?.as_array()?;
    let text: String = segments
        .iter()
        .filter_map(|s| s.get("tgt").and_then(Value::as_str))
        .collect();
    (!text.is_empty()).then_some(text)
}

/// Signed commercial API; needs an app id and secret.
pub struct Baidu {
    client: Client,
    app_id: String,
    secret_key: String,
}

impl Baidu {
    pub fn new(client: Client, app_id: &str, secret_key: &str) -> Result<Self> {
        if app_id.is_empty() || secret_key.is_empty() {
            return Err(PipelineError::Config(
                "baidu provider needs [baidu] app_id and secret_key".into(),
            ));
        }
        Ok(Baidu {
            client,
            app_id: app_id.to_string(),
            secret_key: secret_key.to_string(),
        })
    }
}

impl Translator for Baidu {
    fn provider(&self) -> &'static str {
        "baidu"
    }

    fn translate(&self, text: &str) -> Result<String> {
        let salt = salt().to_string();
        let sign = baidu_sign(&self.app_id, text, &salt, &self.secret_key);
        let body: Value = self
            .client
            .get(BAIDU_URL)
            .query(&[
                ("q", text),
                ("from", "en"),
                ("to", "zh"),
                ("appid", self.app_id.as_str()),
                ("salt", salt.as_str()),
                ("sign", sign.as_str()),
            ])
            .send()?
            .error_for_status()?
            .json()?;
        parse_baidu(&body).ok_or_else(|| no_result(self.provider(), &body))
    }
}

/// md5(appid + q + salt + secret), lowercase hex.
pub fn baidu_sign(app_id: &str, text: &str, salt: &str, secret_key: &str) -> String {
    let mut hasher = Md5::new();
    hasher.update(app_id.as_bytes());
    hasher.update(text.as_bytes());
    hasher.update(salt.as_bytes());
    hasher.update(secret_key.as_bytes());
    format!("{:x}", hasher.finalize())
}

pub fn parse_baidu(body: &Value) -> Option<String> {
    body.get("trans_result")?
        .get(0)?
        .get("dst")?
        .as_str()
        .map(str::to_string)
}

fn salt() -> u32 {
    rand::thread_rng().gen_range(32768..65536)
}

/// Public endpoint behind the common Google Translate client libraries.
pub struct Google {
    client: Client,
}

impl Google {
    pub fn new(client: Client) -> Self {
        Google { client }
    }
}

impl Translator for Google {
    fn provider(&self) -> &'static str {
        "google"
    }

    fn translate(&self, text: &str) -> Result<String> {
        let body: Value = self
            .client
            .get(GOOGLE_URL)
            .query(&[
                ("client", "gtx"),
                ("sl", "en"),
                ("tl", "zh-CN"),
                ("dt", "t"),
                ("q", text),
            ])
            .send()?
            .error_for_status()?
            .json()?;
        parse_google(&body).ok_or_else(|| no_result(self.provider(), &body))
    }
}

/// `[[["译文", "source", ...], ...], ...]`
pub fn parse_google(body: &Value) -> Option<String> {
    let sentences = body.get(0)?.as_array()?;
    let text: String = sentences
        .iter()
        .filter_map(|s| s.get(0).and_then(Value::as_str))
        .collect();
    (!text.is_empty()).then_some(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Failing;

    impl Translator for Failing {
        fn provider(&self) -> &'static str {
            "failing"
        }

        fn translate(&self, _text: &str) -> Result<String> {
            Err(PipelineError::Provider {
                provider: "failing",
                details: "timeout".into(),
            })
        }
    }

    struct Blank;

    impl Translator for Blank {
        fn provider(&self) -> &'static str {
            "blank"
        }

        fn translate(&self, _text: &str) -> Result<String> {
            Ok("  ".into())
        }
    }

    #[test]
    fn provider_errors_become_none() {
        assert_eq!(RemoteLookup::new(Box::new(Failing)).resolve("X"), None);
        assert_eq!(RemoteLookup::new(Box::new(Blank)).resolve("X"), None);
    }

    #[test]
    fn youdao_response() {
        let body = json!({
            "type": "EN2ZH_CN",
            "errorCode": 0,
            "translateResult": [[{ "src": "Hohai University", "tgt": "河海大学" }]]
        });
        assert_eq!(parse_youdao(&body).as_deref(), Some("河海大学"));
        assert_eq!(parse_youdao(&json!({ "errorCode": 50 })), None);
    }

    #[test]
    fn baidu_response_and_signature() {
        let body = json!({
            "from": "en",
            "to": "zh",
            "trans_result": [{ "src": "apple", "dst": "苹果" }]
        });
        assert_eq!(parse_baidu(&body).as_deref(), Some("苹果"));
        assert_eq!(parse_baidu(&json!({ "error_code": "54001" })), None);

        // Worked example from the provider's signing documentation.
        assert_eq!(
            baidu_sign("2015063000000001", "apple", "1435660288", "12345678"),
            "f89f9594663708c1605f3d736d01d2d4"
        );
    }

    #[test]
    fn baidu_requires_credentials() {
        let client = Client::new();
        assert!(matches!(
            Baidu::new(client, "", "secret"),
            Err(PipelineError::Config(_))
        ));
    }

    #[test]
    fn google_response() {
        let body = json!([[["北京大学", "Peking University", null, null, 10]], null, "en"]);
        assert_eq!(parse_google(&body).as_deref(), Some("北京大学"));
        assert_eq!(parse_google(&json!([])), None);
    }

    #[test]
    fn salt_in_range() {
        let salts: Vec<u32> = (0..64).map(|_| salt()).collect();
        assert!(salts.iter().all(|s| (32768..65536).contains(s)));
        assert!(salts.iter().any(|s| *s != salts[0]));
    }
}
