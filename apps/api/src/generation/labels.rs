//! Static per-language text: field labels, section titles, sentinels and error copy.

use crate::generation::models::{Lang, ProfileField, TestKey};

/// Why a report request was rejected before generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingInput {
    Profile,
    Tests,
}

impl std::fmt::Display for MissingInput {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(EN.missing_input(*self))
    }
}

pub struct Labels {
    // Profile fields
    pub name: &'static str,
    pub age: &'static str,
    pub city: &'static str,
    pub education: &'static str,
    pub occupation: &'static str,
    pub interests: &'static str,
    pub goals: &'static str,

    // Sentinels
    pub profile_unavailable: &'static str,
    pub data_unavailable: &'static str,
    pub no_details: &'static str,
    pub no_tests: &'static str,
    pub no_scores: &'static str,

    // Normalizer / prompt
    pub highlights: &'static str,
    pub summary: &'static str,
    pub participant_section: &'static str,
    pub tests_section: &'static str,

    // Test names (prompt lines) and document section titles
    pub disc: &'static str,
    pub multiple_intelligences: &'static str,
    pub riasec: &'static str,
    pub archetypes: &'static str,
    pub disc_title: &'static str,
    pub multiple_intelligences_title: &'static str,
    pub riasec_title: &'static str,
    pub archetypes_title: &'static str,

    // Chart axes
    pub disc_axes: [&'static str; 4],
    pub riasec_axes: [&'static str; 6],
    pub dominant_archetype: &'static str,

    // Document
    pub report_title: &'static str,
    pub cover_subtitle: &'static str,
    pub prepared_for: &'static str,
    pub generated_on: &'static str,
    pub tests_included: &'static str,
    pub contents: &'static str,
    pub participant_title: &'static str,
    pub roadmap_title: &'static str,
    pub conclusion_title: &'static str,
    pub vision: &'static str,
    pub phase: &'static str,
    pub timeframe: &'static str,
    pub focus: &'static str,
    pub habits: &'static str,
    pub support: &'static str,
    pub final_message: &'static str,
    pub page: &'static str,
    pub date_format: &'static str,
    pub filename_prefix: &'static str,

    // Errors
    pub invalid_input_error: &'static str,
    pub missing_profile: &'static str,
    pub missing_tests: &'static str,
    pub generation_error: &'static str,
    pub timeout_error: &'static str,
    pub render_error: &'static str,
    pub internal_error: &'static str,
}

impl Labels {
    pub fn profile_field(&self, field: ProfileField) -> &'static str {
        match field {
            ProfileField::Name => self.name,
            ProfileField::Age => self.age,
            ProfileField::City => self.city,
            ProfileField::Education => self.education,
            ProfileField::Occupation => self.occupation,
            ProfileField::Interests => self.interests,
            ProfileField::Goals => self.goals,
        }
    }

    /// Short test name used in prompt lines.
    pub fn test_label(&self, key: TestKey) -> &'static str {
        match key {
            TestKey::DiscInsight => self.disc,
            TestKey::MultipleIntelligences => self.multiple_intelligences,
            TestKey::Riasec => self.riasec,
            TestKey::Archetypes => self.archetypes,
        }
    }

    /// Document section title for a test.
    pub fn test_title(&self, key: TestKey) -> &'static str {
        match key {
            TestKey::DiscInsight => self.disc_title,
            TestKey::MultipleIntelligences => self.multiple_intelligences_title,
            TestKey::Riasec => self.riasec_title,
            TestKey::Archetypes => self.archetypes_title,
        }
    }

    pub fn missing_input(&self, missing: MissingInput) -> &'static str {
        match missing {
            MissingInput::Profile => self.missing_profile,
            MissingInput::Tests => self.missing_tests,
        }
    }
}

pub static EN: Labels = Labels {
    name: "Name",
    age: "Age",
    city: "City",
    education: "Education",
    occupation: "Occupation",
    interests: "Interests",
    goals: "Goals",

    profile_unavailable: "Participant data unavailable",
    data_unavailable: "data unavailable",
    no_details: "no additional details",
    no_tests: "No test results available",
    no_scores: "No scores were reported for this assessment.",

    highlights: "highlights",
    summary: "summary",
    participant_section: "PARTICIPANT",
    tests_section: "TEST RESULTS",

    disc: "DISC",
    multiple_intelligences: "Multiple Intelligences",
    riasec: "RIASEC",
    archetypes: "Archetypes",
    disc_title: "DISC Insight: Behavioral Style",
    multiple_intelligences_title: "Multiple Intelligences",
    riasec_title: "RIASEC: Vocational Interests",
    archetypes_title: "Archetypes: Core Motivations",

    disc_axes: ["Dominance", "Influence", "Steadiness", "Conscientiousness"],
    riasec_axes: [
        "Realistic",
        "Investigative",
        "Artistic",
        "Social",
        "Enterprising",
        "Conventional",
    ],
    dominant_archetype: "Dominant archetype",

    report_title: "Integrated Profile Report",
    cover_subtitle: "Behavior, talents, interests and motivations",
    prepared_for: "Prepared for",
    generated_on: "Generated on",
    tests_included: "Assessments included",
    contents: "Contents",
    participant_title: "Participant Summary",
    roadmap_title: "Life Roadmap",
    conclusion_title: "Conclusion",
    vision: "Vision",
    phase: "Phase",
    timeframe: "Timeframe",
    focus: "Focus",
    habits: "Habits",
    support: "Support",
    final_message: "Final message",
    page: "Page",
    date_format: "%Y-%m-%d",
    filename_prefix: "profile-report",

    invalid_input_error: "Invalid input",
    missing_profile: "Participant profile data is required.",
    missing_tests: "At least one test result is required.",
    generation_error: "Report generation failed",
    timeout_error: "Report generation timed out",
    render_error: "Document rendering failed",
    internal_error: "Internal server error",
};

pub static PT: Labels = Labels {
    name: "Nome",
    age: "Idade",
    city: "Cidade",
    education: "Escolaridade",
    occupation: "Ocupação",
    interests: "Interesses",
    goals: "Objetivos",

    profile_unavailable: "Dados do participante indisponíveis",
    data_unavailable: "dados indisponíveis",
    no_details: "sem detalhes adicionais",
    no_tests: "Nenhum resultado de teste disponível",
    no_scores: "Nenhuma pontuação foi informada para esta avaliação.",

    highlights: "destaques",
    summary: "resumo",
    participant_section: "PARTICIPANTE",
    tests_section: "RESULTADOS DOS TESTES",

    disc: "DISC",
    multiple_intelligences: "Inteligências Múltiplas",
    riasec: "RIASEC",
    archetypes: "Arquétipos",
    disc_title: "DISC Insight: Estilo Comportamental",
    multiple_intelligences_title: "Inteligências Múltiplas",
    riasec_title: "RIASEC: Interesses Vocacionais",
    archetypes_title: "Arquétipos: Motivações Centrais",

    disc_axes: ["Dominância", "Influência", "Estabilidade", "Conformidade"],
    riasec_axes: [
        "Realista",
        "Investigativo",
        "Artístico",
        "Social",
        "Empreendedor",
        "Convencional",
    ],
    dominant_archetype: "Arquétipo dominante",

    report_title: "Relatório de Perfil Integrado",
    cover_subtitle: "Comportamento, talentos, interesses e motivações",
    prepared_for: "Preparado para",
    generated_on: "Gerado em",
    tests_included: "Avaliações incluídas",
    contents: "Sumário",
    participant_title: "Resumo do Participante",
    roadmap_title: "Roteiro de Vida",
    conclusion_title: "Conclusão",
    vision: "Visão",
    phase: "Fase",
    timeframe: "Prazo",
    focus: "Foco",
    habits: "Hábitos",
    support: "Apoio",
    final_message: "Mensagem final",
    page: "Página",
    date_format: "%d/%m/%Y",
    filename_prefix: "relatorio-perfil",

    invalid_input_error: "Entrada inválida",
    missing_profile: "Os dados do perfil do participante são obrigatórios.",
    missing_tests: "É necessário informar ao menos um resultado de teste.",
    generation_error: "Falha ao gerar o relatório",
    timeout_error: "Tempo esgotado ao gerar o relatório",
    render_error: "Falha ao montar o documento",
    internal_error: "Erro interno do servidor",
};

pub fn labels(lang: Lang) -> &'static Labels {
    match lang {
        Lang::En => &EN,
        Lang::Pt => &PT,
    }
}
