use serde::{de, Deserialize, Deserializer, Serialize};

/// One numbered unit of a book: an article, section or amendment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    /// Zero-based position within the book, assigned at import. This is the
    /// browse index.
    pub ordinal: i32,
    pub number: i32,
    pub title: String,
    pub legal: Vec<Section>,
}

/// An article as submitted for import, before it has an ordinal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewArticle {
    pub number: i32,
    pub title: String,
    #[serde(deserialize_with = "legal_from_documents")]
    pub legal: Vec<Section>,
}

impl NewArticle {
    pub fn into_article(self, ordinal: i32) -> Article {
        Article {
            ordinal,
            number: self.number,
            title: self.title,
            legal: self.legal,
        }
    }
}

/// A sub-unit of an article's `legal` body, told apart by shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Section {
    Header(SectionHeading),
    Content(ContentBlock),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SectionHeading {
    pub subtype: String,
    #[serde(deserialize_with = "number_or_string")]
    pub number: String,
    pub subtitle: String,
}

impl SectionHeading {
    /// Display title, e.g. `Section 3 - Apportionment`.
    pub fn display_title(&self) -> String {
        format!("{} {} - {}", self.subtype, self.number, self.subtitle)
    }

    /// Anchor of the heading on the article page, e.g. `Section_3`.
    pub fn fragment(&self) -> String {
        format!("{}_{}", self.subtype, self.number)
    }
}

/// Paragraphs of text, searched verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ContentBlock {
    pub content: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl NumberOrString {
    fn into_string(self) -> String {
        match self {
            NumberOrString::Integer(n) => n.to_string(),
            NumberOrString::Float(n) => n.to_string(),
            NumberOrString::Text(s) => s,
        }
    }
}

fn number_or_string<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    NumberOrString::deserialize(deserializer).map(NumberOrString::into_string)
}

/// A `legal` entry as it appears in source documents, where one entry may
/// carry a heading and its paragraphs together.
#[derive(Deserialize)]
struct SectionDocument {
    subtype: Option<String>,
    number: Option<NumberOrString>,
    subtitle: Option<String>,
    content: Option<Vec<String>>,
}

impl SectionDocument {
    fn into_sections<E: de::Error>(self) -> Result<Vec<Section>, E> {
        let mut sections = Vec::with_capacity(2);

        match (self.subtype, self.number, self.subtitle) {
            (Some(subtype), Some(number), Some(subtitle)) => {
                sections.push(Section::Header(SectionHeading {
                    subtype,
                    number: number.into_string(),
                    subtitle,
                }));
            }
            (None, None, None) => {}
            _ => {
                return Err(E::custom(
                    "section heading needs `subtype`, `number` and `subtitle`",
                ))
            }
        }

        if let Some(content) = self.content {
            sections.push(Section::Content(ContentBlock { content }));
        }

        if sections.is_empty() {
            return Err(E::custom("section has neither a heading nor content"));
        }
        Ok(sections)
    }
}

/// Reads a `legal` array in source-document shape, splitting combined
/// entries into a [`Section::Header`] followed by a [`Section::Content`].
fn legal_from_documents<'de, D>(deserializer: D) -> Result<Vec<Section>, D::Error>
where
    D: Deserializer<'de>,
{
    let documents = Vec::<SectionDocument>::deserialize(deserializer)?;
    let mut sections = Vec::with_capacity(documents.len() * 2);
    for document in documents {
        sections.extend(document.into_sections::<D::Error>()?);
    }
    Ok(sections)
}
