/// Reusable depth-first machinery over the words of an embedding.
///
/// Nodes are word positions `0..n`; adjacency is supplied per query as a
/// predicate so the same oracle serves vertex adjacency and the line graph
/// of edge-induced embeddings. Buffers keep their capacity between queries.
#[derive(Debug, Clone, Default)]
pub struct ConnectivityOracle {
    visited: Vec<bool>,
    discovery: Vec<usize>,
    low: Vec<usize>,
    parent: Vec<Option<usize>>,
    children: Vec<usize>,
    cut: Vec<bool>,
    order: Vec<usize>,
    stack: Vec<(usize, usize)>,
}

impl ConnectivityOracle {
    pub fn new() -> Self {
        Self::default()
    }

    fn reset(&mut self, n: usize) {
        self.visited.clear();
        self.visited.resize(n, false);
        self.discovery.clear();
        self.discovery.resize(n, 0);
        self.low.clear();
        self.low.resize(n, 0);
        self.parent.clear();
        self.parent.resize(n, None);
        self.children.clear();
        self.children.resize(n, 0);
        self.cut.clear();
        self.cut.resize(n, false);
        self.order.clear();
        self.stack.clear();
    }

    /// Marks every position whose removal disconnects its component.
    ///
    /// Iterative low-link search: a non-root `u` is cut when some DFS child
    /// `v` has `low[v] >= disc[u]`, a root when it has more than one child.
    /// A lone element is never cut.
    pub fn cut_elements<F>(&mut self, n: usize, mut adjacent: F) -> &[bool]
    where
        F: FnMut(usize, usize) -> bool,
    {
        self.reset(n);
        let mut time = 0usize;

        for root in 0..n {
            if self.visited[root] {
                continue;
            }
            self.visited[root] = true;
            self.discovery[root] = time;
            self.low[root] = time;
            time += 1;
            self.stack.push((root, 0));

            while let Some(&(u, next)) = self.stack.last() {
                let mut candidate = next;
                let mut descended = false;
                while candidate < n {
                    let v = candidate;
                    candidate += 1;
                    if v == u || !adjacent(u, v) {
                        continue;
                    }
                    if !self.visited[v] {
                        if let Some(top) = self.stack.last_mut() {
                            top.1 = candidate;
                        }
                        self.visited[v] = true;
                        self.parent[v] = Some(u);
                        self.children[u] += 1;
                        self.discovery[v] = time;
                        self.low[v] = time;
                        time += 1;
                        self.stack.push((v, 0));
                        descended = true;
                        break;
                    } else if self.parent[u] != Some(v) {
                        self.low[u] = self.low[u].min(self.discovery[v]);
                    }
                }
                if descended {
                    continue;
                }

                self.stack.pop();
                if let Some(p) = self.parent[u] {
                    self.low[p] = self.low[p].min(self.low[u]);
                    if self.parent[p].is_some() && self.low[u] >= self.discovery[p] {
                        self.cut[p] = true;
                    }
                }
            }

            if self.children[root] > 1 {
                self.cut[root] = true;
            }
        }

        &self.cut
    }

    /// Depth-first preorder of the positions reachable from `root`,
    /// visiting neighbours in ascending position order.
    pub fn dfs_order<F>(&mut self, n: usize, root: usize, mut adjacent: F) -> &[usize]
    where
        F: FnMut(usize, usize) -> bool,
    {
        self.reset(n);
        if root >= n {
            return &self.order;
        }

        self.visited[root] = true;
        self.order.push(root);
        self.stack.push((root, 0));
        while let Some(&(u, next)) = self.stack.last() {
            let mut candidate = next;
            let mut descended = false;
            while candidate < n {
                let v = candidate;
                candidate += 1;
                if self.visited[v] || !adjacent(u, v) {
                    continue;
                }
                if let Some(top) = self.stack.last_mut() {
                    top.1 = candidate;
                }
                self.visited[v] = true;
                self.order.push(v);
                self.stack.push((v, 0));
                descended = true;
                break;
            }
            if !descended {
                self.stack.pop();
            }
        }

        &self.order
    }

    pub fn is_connected<F>(&mut self, n: usize, adjacent: F) -> bool
    where
        F: FnMut(usize, usize) -> bool,
    {
        n <= 1 || self.dfs_order(n, 0, adjacent).len() == n
    }
}
