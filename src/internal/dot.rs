//! Graphviz dot rendering of a single pattern's NFA, for debugging.
//!
//! There is no whole-DFA equivalent: `dfa_store.rs` builds states lazily and
//! on demand, so there is no fixed state set to enumerate up front the way
//! the teacher's eager, Hopcroft-minimized `Dfa` had.

use std::io::Write;

use dot_writer::{Attributes, DotWriter, RankDirection};

use super::{Nfa, PatternID};

/// Render `nfa` to a graphviz dot format, labeling each state with the
/// pattern it belongs to.
pub(crate) fn nfa_render<W: Write>(nfa: &Nfa, pattern_id: PatternID, output: &mut W) {
    let mut writer = DotWriter::from(output);
    writer.set_pretty_print(true);
    let mut digraph = writer.digraph();
    digraph
        .set_label(&format!(
            "pattern {}: {}",
            pattern_id,
            nfa.source.escape_default()
        ))
        .set_rank_direction(RankDirection::LeftRight);
    for state in nfa.states() {
        let source_id = {
            let mut source_node = digraph.node_auto();
            source_node.set_label(&state.id().as_usize().to_string());
            if state.id() == nfa.start_state() {
                source_node
                    .set_shape(dot_writer::Shape::Circle)
                    .set_color(dot_writer::Color::Blue)
                    .set_pen_width(3.0);
            }
            if state.id() == nfa.end_state() {
                source_node
                    .set_shape(dot_writer::Shape::Circle)
                    .set_color(dot_writer::Color::Red)
                    .set_pen_width(3.0);
            }
            source_node.id()
        };
        for transition in state.transitions() {
            let target_state = transition.target_state();
            digraph
                .edge(
                    source_id.clone(),
                    &format!("node_{}", target_state.as_usize()),
                )
                .attributes()
                .set_label(&format!("{}", transition.char_class()));
        }
        for anchor_transition in state.anchor_transitions() {
            let target_state = anchor_transition.target_state;
            digraph
                .edge(
                    source_id.clone(),
                    &format!("node_{}", target_state.as_usize()),
                )
                .attributes()
                .set_label(&format!("{:?}", anchor_transition.kind));
        }
        for epsilon_transition in state.epsilon_transitions() {
            let target_state = epsilon_transition.target_state();
            digraph
                .edge(
                    source_id.clone(),
                    &format!("node_{}", target_state.as_usize()),
                )
                .attributes()
                .set_label("eps");
        }
    }
}
