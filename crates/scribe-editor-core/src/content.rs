//! Demo document.

/// Block fragments of the demo document, in order.
pub const DEFAULT_CONTENT: &[&str] = &[
    "<h1>The heading</h1>",
    "<p>For years parents have espoused the health <em>benefits</em> of eating <strong>garlic bread</strong> with cheese to their <code>children</code>, with the food earning such an iconic status in our culture that kids will often dress up as warm, cheesy loaf for Halloween.</p>",
    "<h2>What the science tells us</h2>",
    "<p>For years parents have espoused the health <em>benefits</em> of eating <strong>garlic bread</strong> with cheese to their children, with the food earning such an iconic status in our culture that kids will often dress up as warm, cheesy loaf for Halloween.</p>",
    "<h3>Garlic bread with cheese</h3>",
    "<p>But a recent study shows that the celebrated appetizer may be linked to a series of rabies cases springing up around the country.</p>",
    "<ul><li><p>That’s a bullet list with one …</p></li><li><p>… or two list items.</p></li></ul>",
    "<p>But a recent study shows that the celebrated appetizer may be linked to a series of rabies cases springing up around the country.</p>",
    "<blockquote><p>Wow, that’s amazing. Good work, boy! 👏 <br>— Mom</p></blockquote>",
    "<p>But a recent study shows that the celebrated appetizer may be linked to a series of rabies cases springing up around the country.</p>",
    "<pre><code class=\"language-css\">body {\n  display: none;\n}</code></pre>",
    "<p>But a recent study shows that the celebrated appetizer may be linked to a series of rabies cases springing up around the country.</p>",
];

/// The demo document as one HTML string.
pub fn default_content() -> String {
    DEFAULT_CONTENT.concat()
}
