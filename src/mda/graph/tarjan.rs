/// Strongly connected components of a directed graph.
///
/// Nodes are `0..adjacency.len()`. Components come out in reverse
/// topological order: every component appears after all components it has
/// edges into. Each component's nodes are sorted ascending.
///
/// The traversal keeps its own stack of frames so deep dependency chains
/// cannot overflow the call stack.
pub(crate) fn strongly_connected_components(adjacency: &[Vec<usize>]) -> Vec<Vec<usize>> {
    const UNVISITED: usize = usize::MAX;

    let n = adjacency.len();
    let mut index = vec![UNVISITED; n];
    let mut lowlink = vec![0; n];
    let mut on_stack = vec![false; n];
    let mut stack = Vec::new();
    let mut frames: Vec<(usize, usize)> = Vec::new();
    let mut components = Vec::new();
    let mut next_index = 0;

    for root in 0..n {
        if index[root] != UNVISITED {
            continue;
        }
        index[root] = next_index;
        lowlink[root] = next_index;
        next_index += 1;
        stack.push(root);
        on_stack[root] = true;
        frames.push((root, 0));

        while let Some(frame) = frames.last_mut() {
            let node = frame.0;
            if let Some(&next) = adjacency[node].get(frame.1) {
                frame.1 += 1;
                if index[next] == UNVISITED {
                    index[next] = next_index;
                    lowlink[next] = next_index;
                    next_index += 1;
                    stack.push(next);
                    on_stack[next] = true;
                    frames.push((next, 0));
                } else if on_stack[next] {
                    lowlink[node] = lowlink[node].min(index[next]);
                }
                continue;
            }

            frames.pop();
            if let Some(&(parent, _)) = frames.last() {
                lowlink[parent] = lowlink[parent].min(lowlink[node]);
            }
            if lowlink[node] == index[node] {
                let mut component = Vec::new();
                while let Some(member) = stack.pop() {
                    on_stack[member] = false;
                    component.push(member);
                    if member == node {
                        break;
                    }
                }
                component.sort_unstable();
                components.push(component);
            }
        }
    }

    components
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chain_is_all_singletons_in_reverse_order() {
        let adjacency = vec![vec![1], vec![2], vec![]];
        let components = strongly_connected_components(&adjacency);
        assert_eq!(components, vec![vec![2], vec![1], vec![0]]);
    }

    #[test]
    fn finds_cycles() {
        // 0 -> 1 <-> 2 -> 3, and 4 -> 4 is not present (no self edges).
        let adjacency = vec![vec![1], vec![2], vec![1, 3], vec![], vec![0]];
        let mut components = strongly_connected_components(&adjacency);
        components.reverse();
        assert_eq!(components, vec![vec![4], vec![0], vec![1, 2], vec![3]]);
    }

    #[test]
    fn nested_cycles_merge() {
        // 0 -> 1 -> 2 -> 0 and 2 -> 3 -> 2
        let adjacency = vec![vec![1], vec![2], vec![0, 3], vec![2]];
        let components = strongly_connected_components(&adjacency);
        assert_eq!(components, vec![vec![0, 1, 2, 3]]);
    }

    #[test]
    fn deep_chain_does_not_recurse() {
        let n = 200_000;
        let adjacency: Vec<Vec<usize>> = (0..n)
            .map(|i| if i + 1 < n { vec![i + 1] } else { vec![] })
            .collect();
        let components = strongly_connected_components(&adjacency);
        assert_eq!(components.len(), n);
        assert_eq!(components[0], vec![n - 1]);
    }
}
