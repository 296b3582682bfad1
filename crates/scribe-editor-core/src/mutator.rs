//! Structural mutations.
//!
//! Block retagging goes through the engine's own transaction command, so
//! every swap lands in the engine's undo history and fires its normal
//! change notification.

use crate::engine::{BlockTagChange, EditorEngine};
use crate::error::EngineError;
use crate::node::BlockNode;
use crate::overlay::HeadingCommand;
use crate::tag::BlockTag;

/// Replace `node`'s tag with `tag`, keeping its content.
///
/// A node that is no longer attached is left alone: the call logs a warning
/// and returns `Ok(None)`.
pub fn replace_block_tag<E: EditorEngine>(
    engine: &mut E,
    node: &E::Node,
    tag: &BlockTag,
) -> Result<Option<BlockTagChange>, EngineError> {
    if !node.is_attached() {
        tracing::warn!(tag = %node.tag_name(), "block is detached, skipping retag");
        return Ok(None);
    }
    let change = engine.set_block_tag(node, tag)?;
    if let Some(change) = &change {
        tracing::debug!(
            index = change.index,
            from = %change.from.tag_name,
            to = %change.to.tag_name,
            "retagged block"
        );
    }
    Ok(change)
}

/// Apply a heading control's command.
pub fn change_heading<E: EditorEngine>(
    engine: &mut E,
    command: &HeadingCommand<E::Node>,
) -> Result<Option<BlockTagChange>, EngineError> {
    replace_block_tag(engine, &command.node, &BlockTag::Heading(command.level))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EditorConfig;
    use crate::plain::PlainEngine;
    use crate::tag::HeadingLevel;

    #[test]
    fn test_change_heading_keeps_content() {
        let mut engine = PlainEngine::from_html(
            "<p>a</p><h1>Garlic bread with <strong>cheese</strong></h1>",
            &EditorConfig::default(),
        )
        .unwrap();
        let node = engine.child_nodes()[1].clone();
        let command = HeadingCommand {
            node: node.clone(),
            level: HeadingLevel::H3,
        };

        let change = change_heading(&mut engine, &command).unwrap().unwrap();
        assert_eq!(change.index, 1);
        assert_eq!(
            engine.to_html(),
            "<p>a</p><h3>Garlic bread with <strong>cheese</strong></h3>"
        );
        assert!(!node.is_attached());
    }

    #[test]
    fn test_stale_node_leaves_siblings_alone() {
        let mut engine =
            PlainEngine::from_html("<h1>A</h1><h2>B</h2><p>c</p>", &EditorConfig::default())
                .unwrap();
        let stale = engine.child_nodes()[0].clone();
        replace_block_tag(&mut engine, &stale, &BlockTag::Paragraph).unwrap();
        let snapshot = engine.to_html();

        let result =
            replace_block_tag(&mut engine, &stale, &BlockTag::Heading(HeadingLevel::H6)).unwrap();
        assert_eq!(result, None);
        assert_eq!(engine.to_html(), snapshot);
        assert_eq!(snapshot, "<p>A</p><h2>B</h2><p>c</p>");
    }
}
