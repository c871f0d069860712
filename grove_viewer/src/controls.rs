use grove_render::{Container, TreeRenderer};

/// Viewer actions bound to keys
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Grow,
    Wither,
    Reset,
    FocusNext,
    Quit,
}

/// Outcome of a command, for the caller to decide whether to present
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Unchanged,
    Changed,
    Quit,
}

/// Tree the grow and wither keys act on: the focused one, else the first
pub fn target_seed<C: Container>(renderer: &TreeRenderer<C>) -> Option<u32> {
    renderer
        .focused()
        .filter(|seed| renderer.find(*seed).is_some())
        .or_else(|| renderer.instances().first().map(|t| t.seed))
}

/// Seed of the tree after the focused one, wrapping around
pub fn next_focus<C: Container>(renderer: &TreeRenderer<C>) -> Option<u32> {
    let instances = renderer.instances();
    if instances.is_empty() {
        return None;
    }
    let current = renderer
        .focused()
        .and_then(|seed| instances.iter().position(|t| t.seed == seed));
    let next = match current {
        Some(index) => (index + 1) % instances.len(),
        None => 0,
    };
    Some(instances[next].seed)
}

pub fn apply<C: Container>(command: Command, renderer: &mut TreeRenderer<C>) -> Outcome {
    let changed = match command {
        Command::Grow => target_seed(renderer).is_some_and(|seed| renderer.grow_one_level(seed)),
        Command::Wither => target_seed(renderer).is_some_and(|seed| renderer.wither_tree(seed)),
        Command::Reset => match renderer.reset() {
            Ok(()) => true,
            Err(e) => {
                log::error!("Reset failed: {}", e);
                false
            }
        },
        Command::FocusNext => match next_focus(renderer) {
            Some(seed) => {
                log::info!("Focus on tree {seed}");
                let instances = renderer.instances().to_vec();
                renderer.update(instances, false, Some(seed));
                true
            }
            None => false,
        },
        Command::Quit => return Outcome::Quit,
    };

    if changed {
        Outcome::Changed
    } else {
        Outcome::Unchanged
    }
}
