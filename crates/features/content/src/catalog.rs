//! Compiled-in default documents, the last tier the resolver consults.

use fxhash::FxHashMap;
use serde_json::{Value, json};
use std::sync::Arc;
use vitrine_domain::{ContentDocument, ContentDomain, KnownDomain, LanguageCode};

/// A default document together with the language it was written in.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultEntry {
    pub document: ContentDocument,
    pub language: LanguageCode,
}

/// Read-only table of default documents keyed by `(domain, language)`.
///
/// Lookups fall back to the default language ([`LanguageCode::DEFAULT`]) when a translation
/// is missing. Cloning is cheap.
#[derive(Debug, Clone, Default)]
pub struct DefaultCatalog {
    entries: Arc<FxHashMap<(ContentDomain, LanguageCode), ContentDocument>>,
}

impl DefaultCatalog {
    /// An empty catalog: every lookup falls through to an empty document.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The defaults shipped with the site.
    #[must_use]
    pub fn builtin() -> Self {
        let mut catalog = Self::empty();
        for (domain, language, value) in builtin_entries() {
            // Literals are object trees well within the depth limit.
            if let Ok(document) = ContentDocument::new(value) {
                catalog = catalog.with(domain.domain(), language, document);
            }
        }
        catalog
    }

    /// Adds or replaces one default.
    #[must_use]
    pub fn with(mut self, domain: ContentDomain, language: LanguageCode, doc: ContentDocument) -> Self {
        Arc::make_mut(&mut self.entries).insert((domain, language), doc);
        self
    }

    /// The default written for exactly this pair, without fallback.
    #[must_use]
    pub fn get(&self, domain: &ContentDomain, language: LanguageCode) -> Option<&ContentDocument> {
        self.entries.get(&(domain.clone(), language))
    }

    /// The default for the pair, else the default-language default for the domain.
    #[must_use]
    pub fn lookup(&self, domain: &ContentDomain, language: LanguageCode) -> Option<DefaultEntry> {
        [language, LanguageCode::DEFAULT].into_iter().find_map(|lang| {
            self.get(domain, lang)
                .map(|doc| DefaultEntry { document: doc.clone(), language: lang })
        })
    }

    /// Like [`lookup`](Self::lookup), but never empty-handed: unknown pairs get an empty
    /// object in the requested language.
    #[must_use]
    pub fn resolve(&self, domain: &ContentDomain, language: LanguageCode) -> DefaultEntry {
        self.lookup(domain, language)
            .unwrap_or_else(|| DefaultEntry { document: ContentDocument::empty(), language })
    }

    /// Languages with a default of their own for `domain`.
    #[must_use]
    pub fn languages(&self, domain: &ContentDomain) -> Vec<LanguageCode> {
        LanguageCode::ALL.into_iter().filter(|lang| self.get(domain, *lang).is_some()).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn builtin_entries() -> Vec<(KnownDomain, LanguageCode, Value)> {
    use KnownDomain::{BusinessPage, Homepage, News, Projects, SupportPage, Translations};
    use LanguageCode::{En, Ja, Ko, Zh};

    vec![
        (
            Homepage,
            Ko,
            homepage("함께 성장하는 파트너", "신뢰와 기술로 내일을 만듭니다", "문의하기", [
                "완료 프로젝트",
                "협력사",
                "업력",
            ]),
        ),
        (
            Homepage,
            En,
            homepage("Partners in Growth", "Building tomorrow with trust and technology", "Contact us", [
                "Projects delivered",
                "Partners",
                "Years in business",
            ]),
        ),
        (
            Homepage,
            Zh,
            homepage("共同成长的伙伴", "以信任与技术创造明天", "联系我们", [
                "已完成项目",
                "合作伙伴",
                "经营年限",
            ]),
        ),
        (
            Homepage,
            Ja,
            homepage("共に成長するパートナー", "信頼と技術で明日をつくる", "お問い合わせ", [
                "完了プロジェクト",
                "パートナー",
                "創業年数",
            ]),
        ),
        (BusinessPage, Ko, json!({
            "title": "사업 분야",
            "intro": "다양한 산업 분야에서 고객과 함께합니다.",
            "divisions": [
                { "name": "건설", "summary": "설계부터 시공까지", "highlights": ["플랜트", "인프라"] },
                { "name": "IT 서비스", "summary": "디지털 전환 지원", "highlights": ["클라우드", "보안"] }
            ]
        })),
        (BusinessPage, En, json!({
            "title": "Our Business",
            "intro": "We work alongside our clients across many industries.",
            "divisions": [
                { "name": "Construction", "summary": "From design to delivery", "highlights": ["Plants", "Infrastructure"] },
                { "name": "IT Services", "summary": "Digital transformation", "highlights": ["Cloud", "Security"] }
            ]
        })),
        (SupportPage, Ko, json!({
            "title": "고객 지원",
            "intro": "궁금한 점이 있으시면 언제든지 연락주세요.",
            "contacts": [
                { "label": "전화", "value": "02-000-0000" },
                { "label": "이메일", "value": "support@example.com" }
            ],
            "faq": [{ "question": "상담 시간은 언제인가요?", "answer": "평일 오전 9시부터 오후 6시까지입니다." }]
        })),
        (SupportPage, En, json!({
            "title": "Support",
            "intro": "Reach out any time with questions.",
            "contacts": [
                { "label": "Phone", "value": "+82-2-000-0000" },
                { "label": "Email", "value": "support@example.com" }
            ],
            "faq": [{ "question": "When are you available?", "answer": "Weekdays, 9am to 6pm KST." }]
        })),
        (News, Ko, json!({ "items": [] })),
        (Projects, Ko, json!({ "items": [] })),
        (Translations, Ko, translations("홈", "사업 분야", "뉴스", "프로젝트", "고객 지원", "모든 권리 보유.")),
        (Translations, En, translations("Home", "Business", "News", "Projects", "Support", "All rights reserved.")),
        (Translations, Zh, translations("首页", "业务领域", "新闻", "项目", "客户支持", "版权所有。")),
        (Translations, Ja, translations("ホーム", "事業内容", "ニュース", "プロジェクト", "サポート", "無断転載を禁じます。")),
    ]
}

fn homepage(title: &str, subtitle: &str, cta: &str, labels: [&str; 3]) -> Value {
    let [projects, partners, years] = labels;
    json!({
        "hero": { "title": title, "subtitle": subtitle, "ctaLabel": cta },
        "achievements": [
            { "label": projects, "value": 120, "suffix": "+" },
            { "label": partners, "value": 35 },
            { "label": years, "value": 20, "suffix": "+" }
        ],
        "subsidiaries": []
    })
}

fn translations(
    home: &str,
    business: &str,
    news: &str,
    projects: &str,
    support: &str,
    rights: &str,
) -> Value {
    json!({
        "nav": {
            "home": home,
            "business": business,
            "news": news,
            "projects": projects,
            "support": support
        },
        "footer": { "rights": rights }
    })
}
