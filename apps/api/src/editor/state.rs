//! Editor state and its reducer.
//!
//! `reduce` is a pure function: it takes the state by value and returns the next
//! one. The wire shape of `EditorAction` follows the browser client's
//! `{type, payload}` actions.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::editor::theme::{default_theme, ColorTheme};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    #[default]
    View,
    Edit,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockHeight {
    #[default]
    Auto,
    Small,
    Medium,
    Large,
    Custom,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockPadding {
    None,
    Small,
    #[default]
    Medium,
    Large,
}

pub const DEFAULT_BACKGROUND: &str = "#ffffff";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BlockStyle {
    pub height: BlockHeight,
    /// Pixel height, only meaningful with `BlockHeight::Custom`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_height: Option<u32>,
    pub background_color: String,
    pub padding: BlockPadding,
}

impl Default for BlockStyle {
    fn default() -> Self {
        BlockStyle {
            height: BlockHeight::Auto,
            custom_height: None,
            background_color: DEFAULT_BACKGROUND.to_string(),
            padding: BlockPadding::Medium,
        }
    }
}

/// Partial style update; absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BlockStylePatch {
    pub height: Option<BlockHeight>,
    pub custom_height: Option<u32>,
    pub background_color: Option<String>,
    pub padding: Option<BlockPadding>,
}

impl BlockStyle {
    fn merged(mut self, patch: BlockStylePatch) -> Self {
        if let Some(height) = patch.height {
            self.height = height;
        }
        if let Some(custom_height) = patch.custom_height {
            self.custom_height = Some(custom_height);
        }
        if let Some(color) = patch.background_color {
            self.background_color = color;
        }
        if let Some(padding) = patch.padding {
            self.padding = padding;
        }
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Block {
    pub id: String,
    /// Section index this block renders at.
    pub position: usize,
    pub style: BlockStyle,
}

/// Block id for the section at `index`.
pub fn block_id(index: usize) -> String {
    format!("block-{index}")
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EditorState {
    pub mode: EditorMode,
    pub selected_block_id: Option<String>,
    pub blocks: BTreeMap<String, Block>,
    pub color_theme: ColorTheme,
    pub is_dirty: bool,
}

impl Default for EditorState {
    fn default() -> Self {
        EditorState {
            mode: EditorMode::View,
            selected_block_id: None,
            blocks: BTreeMap::new(),
            color_theme: default_theme(),
            is_dirty: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "SCREAMING_SNAKE_CASE"
)]
pub enum EditorAction {
    SetMode(EditorMode),
    SelectBlock(Option<String>),
    UpdateBlock { id: String, style: BlockStylePatch },
    ReorderBlocks(Vec<String>),
    UpdateTheme(ColorTheme),
    SetDirty(bool),
    ResetEditor,
    InitializeBlocks(usize),
}

pub fn reduce(state: EditorState, action: EditorAction) -> EditorState {
    match action {
        EditorAction::SetMode(mode) => EditorState {
            selected_block_id: match mode {
                EditorMode::View => None,
                EditorMode::Edit => state.selected_block_id,
            },
            mode,
            ..state
        },

        EditorAction::SelectBlock(id) => EditorState {
            selected_block_id: id,
            ..state
        },

        EditorAction::UpdateBlock { id, style } => {
            let mut blocks = state.blocks;
            let position = blocks.values().map(|b| b.position + 1).max().unwrap_or(0);
            let block = blocks.remove(&id).unwrap_or_else(|| Block {
                id: id.clone(),
                position,
                style: BlockStyle::default(),
            });
            blocks.insert(
                id,
                Block {
                    style: block.style.merged(style),
                    ..block
                },
            );
            EditorState {
                blocks,
                is_dirty: true,
                ..state
            }
        }

        EditorAction::ReorderBlocks(ids) => {
            let mut previous = state.blocks;
            let mut blocks = BTreeMap::new();
            for (position, id) in ids.into_iter().enumerate() {
                if let Some(block) = previous.remove(&id) {
                    blocks.insert(id, Block { position, ..block });
                }
            }
            EditorState {
                blocks,
                is_dirty: true,
                ..state
            }
        }

        EditorAction::UpdateTheme(theme) => EditorState {
            color_theme: theme,
            is_dirty: true,
            ..state
        },

        EditorAction::SetDirty(is_dirty) => EditorState { is_dirty, ..state },

        EditorAction::ResetEditor => EditorState::default(),

        EditorAction::InitializeBlocks(count) => {
            let mut blocks = state.blocks;
            for index in 0..count {
                let id = block_id(index);
                blocks.entry(id.clone()).or_insert_with(|| Block {
                    id,
                    position: index,
                    style: BlockStyle::default(),
                });
            }
            EditorState { blocks, ..state }
        }
    }
}
