//! Read-only view of a decoded quest payload, enough to list it.
//!
//! The payload opens with a text identification line. The section table
//! starts at the first `HDR ` tag; every section is a 12-byte header (4-byte
//! id, two little-endian u16 versions, little-endian u32 size) followed by
//! its body.

use crate::encoding::quest_str_to_utf8;
use crate::error::{QstError, QstResult};

pub const QUEST_ID_CLASSIC: &str = "AG Zelda Classic Quest File";
pub const QUEST_ID_ENHANCED: &str = "AG ZC Enhanced Quest File";

const HEADER_SECTION_ID: &[u8; 4] = b"HDR ";
const SECTION_HEADER_LEN: usize = 12;
const HDR_BODY_MIN_LEN: usize = 170;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionInfo {
    pub id: String,
    pub sversion: u16,
    pub cversion: u16,
    pub offset: usize,
    pub size: u32,
    pub crc32: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestHeader {
    pub zelda_version: u16,
    pub build: u8,
    pub quest_number: u8,
    pub version: String,
    pub min_version: String,
    pub title: String,
    pub author: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestSummary {
    pub id_line: String,
    pub header: Option<QuestHeader>,
    pub sections: Vec<SectionInfo>,
}

impl QuestSummary {
    pub fn is_known_id(&self) -> bool {
        self.id_line == QUEST_ID_CLASSIC || self.id_line == QUEST_ID_ENHANCED
    }
}

impl QuestHeader {
    fn parse(body: &[u8]) -> Option<Self> {
        if body.len() < HDR_BODY_MIN_LEN {
            return None;
        }
        Some(QuestHeader {
            zelda_version: u16::from_le_bytes([body[0], body[1]]),
            build: body[2],
            // 16-byte password hash and 2-byte internal flag are skipped.
            quest_number: body[21],
            version: quest_str_to_utf8(&body[22..31]),
            min_version: quest_str_to_utf8(&body[31..40]),
            title: quest_str_to_utf8(&body[40..105]),
            author: quest_str_to_utf8(&body[105..170]),
        })
    }
}

/// Walk a decoded quest payload.
pub fn summarize(payload: &[u8]) -> QstResult<QuestSummary> {
    let line_end = payload
        .iter()
        .position(|&b| b == b'\n')
        .unwrap_or(payload.len());
    let id_line = quest_str_to_utf8(&payload[..line_end]).trim().to_string();

    let Some(start) = payload
        .windows(HEADER_SECTION_ID.len())
        .position(|w| w == HEADER_SECTION_ID)
    else {
        return Ok(QuestSummary {
            id_line,
            header: None,
            sections: Vec::new(),
        });
    };

    let mut header = None;
    let mut sections = Vec::new();
    let mut pos = start;

    while pos < payload.len() {
        let available = payload.len() - pos;
        let head = payload
            .get(pos..pos + SECTION_HEADER_LEN)
            .ok_or(QstError::SectionOverrun {
                offset: pos,
                needed: SECTION_HEADER_LEN,
                available,
            })?;
        let size = u32::from_le_bytes([head[8], head[9], head[10], head[11]]);
        let body_start = pos + SECTION_HEADER_LEN;
        let body = body_start
            .checked_add(size as usize)
            .and_then(|body_end| payload.get(body_start..body_end))
            .ok_or(QstError::SectionOverrun {
                offset: pos,
                needed: SECTION_HEADER_LEN.saturating_add(size as usize),
                available,
            })?;
        let body_end = body_start + body.len();

        if &head[0..4] == HEADER_SECTION_ID && header.is_none() {
            header = QuestHeader::parse(body);
        }

        sections.push(SectionInfo {
            id: String::from_utf8_lossy(&head[0..4]).into_owned(),
            sversion: u16::from_le_bytes([head[4], head[5]]),
            cversion: u16::from_le_bytes([head[6], head[7]]),
            offset: pos,
            size,
            crc32: crc32fast::hash(body),
        });
        pos = body_end;
    }

    Ok(QuestSummary {
        id_line,
        header,
        sections,
    })
}
