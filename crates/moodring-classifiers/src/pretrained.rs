//! Pretrained DistilBERT sentiment scorer
//!
//! Runs a DistilBERT sequence-classification checkpoint (SST-2 by default)
//! with Candle. The checkpoint is resolved once, at load time, from a local
//! directory or the Hugging Face Hub. Without the `ml-models` feature the
//! loader always fails, leaving the pretrained backend unavailable.

use crate::classifier::SentimentScorer;
use crate::model_config::PretrainedConfig;
use moodring_core::Result;
use std::borrow::Cow;

/// Input length limit of the pretrained backend, in tokens
pub const MAX_INPUT_TOKENS: usize = 512;

/// Keep at most `max_words` whitespace-separated words.
///
/// Applied before tokenization; the tokenizer encoding is truncated again to
/// the token limit since word pieces can outnumber words.
pub fn truncate_words(text: &str, max_words: usize) -> Cow<'_, str> {
    if text.split_whitespace().nth(max_words).is_none() {
        return Cow::Borrowed(text);
    }
    Cow::Owned(
        text.split_whitespace()
            .take(max_words)
            .collect::<Vec<_>>()
            .join(" "),
    )
}

/// Load the pretrained scorer described by `config`.
///
/// Called once at startup; the outcome is captured by
/// [`ModelAvailability`](crate::engine::ModelAvailability).
pub fn load_pretrained(config: &PretrainedConfig) -> Result<Box<dyn SentimentScorer>> {
    #[cfg(feature = "ml-models")]
    {
        Ok(Box::new(ml::DistilBertSentimentScorer::load(config)?))
    }

    #[cfg(not(feature = "ml-models"))]
    {
        let _ = config;
        Err(moodring_core::Error::model(
            "pretrained backend requires the 'ml-models' feature",
        ))
    }
}

#[cfg(feature = "ml-models")]
mod ml {
    use super::truncate_words;
    use crate::classifier::{ModelScore, ScoreOutput, SentimentScorer};
    use crate::model_config::{ModelSource, PretrainedConfig};
    use candle_core::{DType, Device, IndexOp, Tensor, D};
    use candle_nn::{Linear, Module, VarBuilder};
    use candle_transformers::models::distilbert::{Config as DistilBertConfig, DistilBertModel};
    use moodring_core::{Backend, Error, Result};
    use std::path::{Path, PathBuf};
    use tokenizers::{Tokenizer, TruncationParams};

    /// DistilBERT with its sequence-classification head
    pub(super) struct DistilBertSentimentScorer {
        name: String,
        tokenizer: Tokenizer,
        model: DistilBertModel,
        pre_classifier: Option<Linear>,
        classifier: Linear,
        device: Device,
        labels: Vec<String>,
        max_length: usize,
    }

    impl DistilBertSentimentScorer {
        pub(super) fn load(config: &PretrainedConfig) -> Result<Self> {
            let model_path = resolve_model_path(&config.source)?;
            tracing::info!("Loading pretrained sentiment model from {}", model_path.display());

            let mut tokenizer = load_tokenizer(&model_path)?;
            configure_truncation(&mut tokenizer, config.max_length)?;

            let config_str = std::fs::read_to_string(model_path.join("config.json"))
                .map_err(|e| Error::model(format!("Failed to read config: {}", e)))?;
            let config_json: serde_json::Value = serde_json::from_str(&config_str)
                .map_err(|e| Error::model(format!("Failed to parse config JSON: {}", e)))?;

            let hidden_size = config_json
                .get("dim")
                .or_else(|| config_json.get("hidden_size"))
                .and_then(|v| v.as_u64())
                .unwrap_or(768) as usize;
            let labels = id2label(&config_json);

            let distilbert_config: DistilBertConfig = serde_json::from_str(&config_str)
                .map_err(|e| Error::model(format!("Failed to parse config: {}", e)))?;

            let device = get_device(&config.device)?;
            let vb = load_var_builder(&model_path, &device)?;

            let model = DistilBertModel::load(vb.pp("distilbert"), &distilbert_config)
                .map_err(|e| Error::model(format!("Failed to load DistilBERT model: {}", e)))?;

            let pre_classifier =
                candle_nn::linear(hidden_size, hidden_size, vb.pp("pre_classifier")).ok();
            let classifier = candle_nn::linear(hidden_size, labels.len(), vb.pp("classifier"))
                .map_err(|e| {
                    Error::model(format!("Failed to load classification head: {}", e))
                })?;

            tracing::info!(
                "Loaded DistilBERT sentiment model '{}' with labels {:?}",
                config.name,
                labels
            );

            Ok(Self {
                name: config.name.clone(),
                tokenizer,
                model,
                pre_classifier,
                classifier,
                device,
                labels,
                max_length: config.max_length,
            })
        }

        fn probabilities(&self, text: &str) -> Result<Vec<f32>> {
            let text = truncate_words(text, self.max_length);

            let encoding = self
                .tokenizer
                .encode(text.as_ref(), true)
                .map_err(|e| Error::scorer(format!("Tokenization failed: {}", e)))?;

            let input_ids: Vec<i64> = encoding.get_ids().iter().map(|&x| x as i64).collect();
            let input_ids = Tensor::new(input_ids.as_slice(), &self.device)
                .and_then(|t| t.unsqueeze(0))
                .map_err(|e| Error::scorer(format!("Failed to create input tensor: {}", e)))?;

            // DistilBERT masks positions set to 1
            let mask: Vec<u8> = encoding
                .get_attention_mask()
                .iter()
                .map(|&x| u8::from(x == 0))
                .collect();
            let mask = Tensor::new(mask.as_slice(), &self.device)
                .and_then(|t| t.unsqueeze(0))
                .map_err(|e| Error::scorer(format!("Failed to create attention mask: {}", e)))?;

            let hidden_states = self
                .model
                .forward(&input_ids, &mask)
                .map_err(|e| Error::scorer(format!("Model forward pass failed: {}", e)))?;

            let cls_embedding = hidden_states
                .i((0, 0, ..))
                .and_then(|t| t.unsqueeze(0))
                .map_err(|e| Error::scorer(format!("Failed to get CLS token: {}", e)))?;

            let pooled = match &self.pre_classifier {
                Some(pre_classifier) => pre_classifier
                    .forward(&cls_embedding)
                    .and_then(|t| t.relu())
                    .map_err(|e| Error::scorer(format!("Pre-classifier failed: {}", e)))?,
                None => cls_embedding,
            };

            let logits = self
                .classifier
                .forward(&pooled)
                .map_err(|e| Error::scorer(format!("Classification head failed: {}", e)))?;

            candle_nn::ops::softmax(&logits, D::Minus1)
                .and_then(|t| t.squeeze(0))
                .and_then(|t| t.to_vec1::<f32>())
                .map_err(|e| Error::scorer(format!("Softmax failed: {}", e)))
        }
    }

    impl SentimentScorer for DistilBertSentimentScorer {
        fn score(&self, text: &str) -> Result<ScoreOutput> {
            let probs = self.probabilities(text)?;

            let (index, probability) = probs
                .iter()
                .copied()
                .enumerate()
                .max_by(|(_, a), (_, b)| a.total_cmp(b))
                .ok_or_else(|| Error::scorer("Model returned no class probabilities"))?;

            let label = self
                .labels
                .get(index)
                .cloned()
                .unwrap_or_else(|| format!("LABEL_{}", index));

            Ok(ScoreOutput::Model(ModelScore::new(label, f64::from(probability))))
        }

        fn name(&self) -> &str {
            &self.name
        }

        fn backend(&self) -> Backend {
            Backend::Pretrained
        }
    }

    fn resolve_model_path(source: &ModelSource) -> Result<PathBuf> {
        match source {
            ModelSource::Local { path } => {
                if !path.exists() {
                    return Err(Error::model(format!(
                        "Model path does not exist: {}",
                        path.display()
                    )));
                }
                Ok(path.clone())
            }
            ModelSource::HuggingFace { repo, revision } => download_from_huggingface(repo, revision),
        }
    }

    fn download_from_huggingface(repo: &str, revision: &str) -> Result<PathBuf> {
        tracing::info!("Downloading model from HuggingFace: {} @ {}", repo, revision);

        let api = hf_hub::api::sync::Api::new().map_err(|e| {
            Error::model(format!("Failed to initialize HuggingFace API: {}", e))
        })?;
        let repo_obj = api.repo(hf_hub::Repo::with_revision(
            repo.to_string(),
            hf_hub::RepoType::Model,
            revision.to_string(),
        ));

        let config_path = repo_obj
            .get("config.json")
            .map_err(|e| Error::model(format!("Failed to download config.json: {}", e)))?;
        repo_obj
            .get("model.safetensors")
            .map_err(|e| Error::model(format!("Failed to download model.safetensors: {}", e)))?;

        let found_tokenizer = ["tokenizer.json", "vocab.txt"].iter().any(|file| {
            match repo_obj.get(file) {
                Ok(_) => true,
                Err(e) => {
                    tracing::debug!("Tokenizer file {} not available: {}", file, e);
                    false
                }
            }
        });
        if !found_tokenizer {
            return Err(Error::model(
                "No tokenizer found (tried tokenizer.json, vocab.txt)",
            ));
        }

        let model_dir = config_path
            .parent()
            .ok_or_else(|| Error::model("Invalid cache path"))?;

        tracing::info!("Model available at: {}", model_dir.display());
        Ok(model_dir.to_path_buf())
    }

    fn get_device(device: &str) -> Result<Device> {
        match device.to_lowercase().as_str() {
            "cuda" | "cuda:0" => Device::new_cuda(0)
                .map_err(|e| Error::model(format!("Failed to initialize CUDA: {}", e))),
            "mps" | "metal" => Device::new_metal(0)
                .map_err(|e| Error::model(format!("Failed to initialize Metal: {}", e))),
            _ => Ok(Device::Cpu),
        }
    }

    fn load_var_builder(model_path: &Path, device: &Device) -> Result<VarBuilder<'static>> {
        let weights_path = model_path.join("model.safetensors");
        if !weights_path.exists() {
            return Err(Error::model(format!(
                "model.safetensors not found in {}",
                model_path.display()
            )));
        }

        // Safety: the weights file is memory-mapped read-only and not modified while loaded
        unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, device)
                .map_err(|e| Error::model(format!("Failed to load weights: {}", e)))
        }
    }

    fn load_tokenizer(model_path: &Path) -> Result<Tokenizer> {
        let tokenizer_json_path = model_path.join("tokenizer.json");
        if tokenizer_json_path.exists() {
            tracing::debug!("Loading tokenizer from tokenizer.json");
            return Tokenizer::from_file(&tokenizer_json_path)
                .map_err(|e| Error::model(format!("Failed to load tokenizer.json: {}", e)));
        }

        let vocab_path = model_path.join("vocab.txt");
        if vocab_path.exists() {
            tracing::debug!("Building tokenizer from vocab.txt");

            use tokenizers::models::wordpiece::WordPiece;
            use tokenizers::normalizers::BertNormalizer;
            use tokenizers::pre_tokenizers::bert::BertPreTokenizer;
            use tokenizers::processors::bert::BertProcessing;

            let wordpiece = WordPiece::from_file(vocab_path.to_string_lossy().as_ref())
                .unk_token("[UNK]".to_string())
                .build()
                .map_err(|e| Error::model(format!("Failed to build WordPiece model: {}", e)))?;

            let mut tokenizer = Tokenizer::new(wordpiece);
            tokenizer.with_normalizer(Some(BertNormalizer::default()));
            tokenizer.with_pre_tokenizer(Some(BertPreTokenizer));
            tokenizer.with_post_processor(Some(BertProcessing::new(
                ("[SEP]".to_string(), 102),
                ("[CLS]".to_string(), 101),
            )));

            return Ok(tokenizer);
        }

        Err(Error::model(format!(
            "No tokenizer found in {} (tried tokenizer.json, vocab.txt)",
            model_path.display()
        )))
    }

    /// Truncate encodings to `max_length` tokens, special tokens included
    fn configure_truncation(tokenizer: &mut Tokenizer, max_length: usize) -> Result<()> {
        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length,
                ..Default::default()
            }))
            .map_err(|e| Error::model(format!("Failed to configure truncation: {}", e)))?;
        Ok(())
    }

    /// Class names ordered by class index, from the checkpoint's `id2label`
    fn id2label(config_json: &serde_json::Value) -> Vec<String> {
        let mut labels: Vec<(usize, String)> = config_json
            .get("id2label")
            .and_then(|v| v.as_object())
            .map(|map| {
                map.iter()
                    .filter_map(|(idx, label)| {
                        Some((idx.parse().ok()?, label.as_str()?.to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default();

        if labels.is_empty() {
            return vec!["NEGATIVE".to_string(), "POSITIVE".to_string()];
        }

        labels.sort_by_key(|(idx, _)| *idx);
        labels.into_iter().map(|(_, label)| label).collect()
    }

}
