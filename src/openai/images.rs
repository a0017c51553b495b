use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use crate::openai::client::{ClientHandle, Defaults};
use crate::openai::error::OperationError;
use crate::openai::transport::{Endpoint, Transport};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageSize {
    Size256,
    Size512,
    #[default]
    Size1024,
    Size1792x1024,
    Size1024x1792,
}

impl ImageSize {
    const ALL: [Self; 5] = [
        Self::Size256,
        Self::Size512,
        Self::Size1024,
        Self::Size1792x1024,
        Self::Size1024x1792,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Size256 => "256x256",
            Self::Size512 => "512x512",
            Self::Size1024 => "1024x1024",
            Self::Size1792x1024 => "1792x1024",
            Self::Size1024x1792 => "1024x1792",
        }
    }
}

impl Serialize for ImageSize {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl FromStr for ImageSize {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|size| size.as_str() == value.trim())
            .ok_or_else(|| {
                let supported = Self::ALL.map(Self::as_str).join(", ");
                format!("unsupported image size '{value}'. Supported values: {supported}.")
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageQuality {
    #[default]
    Standard,
    Hd,
}

impl FromStr for ImageQuality {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "standard" => Ok(Self::Standard),
            "hd" => Ok(Self::Hd),
            _ => Err(format!(
                "unsupported image quality '{value}'. Supported values: standard, hd."
            )),
        }
    }
}

/// Optional knobs for [`ClientHandle::image_generation`].
#[derive(Debug, Clone, PartialEq)]
pub struct ImageOptions {
    pub model: Option<String>,
    pub size: ImageSize,
    pub quality: ImageQuality,
    pub count: u32,
}

impl Default for ImageOptions {
    fn default() -> Self {
        Self {
            model: None,
            size: ImageSize::default(),
            quality: ImageQuality::default(),
            count: 1,
        }
    }
}

/// Image-generation payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageGenerationRequest {
    pub model: String,
    pub prompt: String,
    pub size: ImageSize,
    pub quality: ImageQuality,
    pub n: u32,
}

impl ImageGenerationRequest {
    pub fn build(defaults: &Defaults, prompt: &str, options: &ImageOptions) -> Self {
        Self {
            model: options
                .model
                .clone()
                .unwrap_or_else(|| defaults.image_model.clone()),
            prompt: prompt.to_string(),
            size: options.size,
            quality: options.quality,
            n: options.count,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ImageResponse {
    data: Vec<ImageData>,
}

#[derive(Debug, Deserialize)]
struct ImageData {
    url: Option<String>,
    b64_json: Option<String>,
}

impl ImageData {
    fn into_locator(self) -> Option<String> {
        self.url
            .or_else(|| self.b64_json.map(|data| format!("data:image/png;base64,{data}")))
    }
}

impl<T: Transport> ClientHandle<T> {
    /// Generates images and returns one locator per image, in provider order.
    pub fn image_generation(
        &self,
        prompt: &str,
        options: &ImageOptions,
    ) -> Result<Vec<String>, OperationError> {
        let endpoint = Endpoint::ImageGenerations;
        let request = ImageGenerationRequest::build(self.defaults(), prompt, options);
        let body: ImageResponse = self.dispatch(endpoint, &request)?;

        body.data
            .into_iter()
            .map(|image| {
                image.into_locator().ok_or_else(|| {
                    OperationError::malformed(endpoint, "image entry has neither url nor b64_json")
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;
    use serde_json::json;

    use super::{ImageOptions, ImageQuality, ImageSize};
    use crate::openai::error::OperationError;
    use crate::openai::fake::FakeTransport;

    #[test]
    fn urls_are_returned_in_order() {
        let client = FakeTransport::new()
            .reply(json!({
                "created": 1,
                "data": [
                    {"url": "https://img.example/1.png", "revised_prompt": "a lake"},
                    {"url": "https://img.example/2.png"}
                ]
            }))
            .into_handle();
        let urls = client
            .image_generation("a lake", &ImageOptions::default())
            .unwrap();
        assert_eq!(urls, vec!["https://img.example/1.png", "https://img.example/2.png"]);
    }

    #[test]
    fn payload_carries_tutorial_defaults() {
        let client = FakeTransport::new()
            .reply(json!({"created": 1, "data": []}))
            .into_handle();
        client
            .image_generation("mountains", &ImageOptions::default())
            .unwrap();
        assert_eq!(
            client.transport().calls()[0].1,
            json!({
                "model": "dall-e-3",
                "prompt": "mountains",
                "size": "1024x1024",
                "quality": "standard",
                "n": 1
            })
        );
    }

    #[test]
    fn inline_images_become_data_uris() {
        let client = FakeTransport::new()
            .reply(json!({"created": 1, "data": [{"b64_json": "iVBORw0K"}]}))
            .into_handle();
        let urls = client
            .image_generation("x", &ImageOptions::default())
            .unwrap();
        assert_eq!(urls, vec!["data:image/png;base64,iVBORw0K"]);
    }

    #[test]
    fn entry_without_locator_is_malformed() {
        let client = FakeTransport::new()
            .reply(json!({"created": 1, "data": [{"revised_prompt": "x"}]}))
            .into_handle();
        let err = client
            .image_generation("x", &ImageOptions::default())
            .unwrap_err();
        assert!(matches!(err, OperationError::Malformed { .. }));
    }

    #[test]
    fn content_policy_rejection_is_reported() {
        let client = FakeTransport::new()
            .fail(StatusCode::BAD_REQUEST, "Your request was rejected by the safety system")
            .into_handle();
        assert!(client
            .image_generation("x", &ImageOptions::default())
            .is_err());
    }

    #[test]
    fn sizes_and_qualities_parse_from_cli_values() {
        assert_eq!("1792x1024".parse::<ImageSize>().unwrap(), ImageSize::Size1792x1024);
        assert_eq!("HD".parse::<ImageQuality>().unwrap(), ImageQuality::Hd);
        let err = "800x600".parse::<ImageSize>().unwrap_err();
        assert!(err.contains("Supported values: 256x256"));
    }

    #[test]
    fn every_size_serializes_to_the_value_it_parses_from() {
        for size in ImageSize::ALL {
            let rendered = serde_json::to_value(size).unwrap();
            assert_eq!(rendered, json!(size.as_str()));
            assert_eq!(size.as_str().parse::<ImageSize>().unwrap(), size);
        }
    }
}
