use async_trait::async_trait;
use chatgpt::client::ChatGPT;
use chatgpt::types::CompletionResponse;
use log::debug;
use serde::Serialize;

use crate::quiz::content::EXPERT;
use crate::quiz::report::{FallbackPolicy, Report, ReportError, ReportGenerator, ReportRequest};

/// Asks ChatGPT to write the persona report in the coach's voice.
pub struct QuizHelper {
    personality: Personality,
    persona_ids: Vec<&'static str>,
    /// Same bar the fallback report uses for its strong persona.
    strong_threshold: u32,
    strong_persona_id: String,
    chat_gpt: ChatGPT,
}

impl QuizHelper {
    pub fn new(
        chat_gpt: ChatGPT,
        personality: Personality,
        persona_ids: Vec<&'static str>,
        policy: &FallbackPolicy,
    ) -> Self {
        Self {
            personality,
            persona_ids,
            strong_threshold: policy.strong_threshold,
            strong_persona_id: policy.strong_persona_id.clone(),
            chat_gpt,
        }
    }

    fn build_prompt(&self, request: &ReportRequest) -> Result<String, ReportError> {
        let scores = encode(&request.per_category_scores)?;
        let answers = encode(&request.answers)?;

        Ok(format!(
            "你是形象教練「{coach}」，正在為一位 25-35 歲男性撰寫「脫單力檢核」的深度報告。
        測驗總分：{total}/{max}
        各維度分數：{scores}
        逐題作答：{answers}

        只回傳一個 JSON 物件，不要加任何 Markdown 標記，欄位如下：
        selectedPersonaId：從 [{ids}] 中挑一個最貼切的 ID
        personaExplanation：為什麼是這個人格（約 100 字）
        personaOverview：一句話總結他的現況
        appearanceAnalysis、socialAnalysis、interactionAnalysis、mindsetAnalysis：各維度的具體分析與建議（各約 50 字）
        coachGeneralAdvice：教練的總結建議（約 100 字）

        總分高於 {threshold} 且各維度均衡時，selectedPersonaId 必須是 {strong}。
        語氣：{tone}",
            coach = EXPERT.name,
            total = request.total_score,
            max = request.max_score,
            scores = scores,
            answers = answers,
            ids = self.persona_ids.join(", "),
            threshold = self.strong_threshold,
            strong = self.strong_persona_id,
            tone = self.personality.get_tone(),
        ))
    }
}

fn encode<T: Serialize>(value: &T) -> Result<String, ReportError> {
    serde_json::to_string(value).map_err(ReportError::Encode)
}

#[async_trait]
impl ReportGenerator for QuizHelper {
    async fn generate(&self, request: &ReportRequest) -> Result<Report, ReportError> {
        debug!("Generating report for total score {}", request.total_score);
        let prompt = self.build_prompt(request)?;

        let response: CompletionResponse = self
            .chat_gpt
            .send_message(&prompt)
            .await
            .map_err(|err| ReportError::Backend(err.to_string()))?;
        let content = response.message().clone().content;

        debug!("Completion: {:?}", content);

        Report::from_completion(&content)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Personality {
    Stern,
    Warm,
}

impl Personality {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "stern" => Some(Personality::Stern),
            "warm" => Some(Personality::Warm),
            _ => None,
        }
    }

    pub fn get_tone(&self) -> &'static str {
        match self {
            Personality::Stern => "有威嚴、專業、直白",
            Personality::Warm => "溫暖、鼓勵、具體",
        }
    }
}
