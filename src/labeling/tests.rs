#[cfg(test)]
mod tests {
    use crate::algorithms::{EnclosingSubgraph, FringeSampler, KHopSampler, SubgraphSampler};
    use crate::graph::{CsrMatrix, LinkGraph};
    use crate::labeling::{
        de_plus_node_labeling, drnl_hash, drnl_node_labeling, NodeLabeling, NodeLabels,
    };
    use crate::error::GraphError;
    use pretty_assertions::assert_eq;
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64;

    fn symmetric(n: usize, pairs: &[(usize, usize)]) -> CsrMatrix {
        let rows: Vec<usize> = pairs.iter().flat_map(|&(s, t)| [s, t]).collect();
        let cols: Vec<usize> = pairs.iter().flat_map(|&(s, t)| [t, s]).collect();
        CsrMatrix::from_triplets(n, n, &rows, &cols, &vec![1.0; rows.len()]).unwrap()
    }

    fn path_subgraph() -> EnclosingSubgraph {
        // 0 - 1 - 2 - 3 - 4, target link (0, 4)
        let graph = LinkGraph::undirected(5, &[(0, 1), (1, 2), (2, 3), (3, 4)]).unwrap();
        let sampler = KHopSampler::new(2, FringeSampler::unsampled(false));
        sampler.sample(&graph, 0, 4, 1, &mut Pcg64::seed_from_u64(0)).unwrap()
    }

    fn random_graph(n: usize, p: f64, seed: u64) -> LinkGraph {
        let mut rng = Pcg64::seed_from_u64(seed);
        let mut edges = Vec::new();
        for u in 0..n {
            for v in (u + 1)..n {
                if rng.gen::<f64>() < p {
                    edges.push((u, v));
                }
            }
        }
        LinkGraph::undirected(n, &edges).unwrap()
    }

    #[test]
    fn test_drnl_hash_values() {
        assert_eq!(drnl_hash(1, 1), 2);
        assert_eq!(drnl_hash(1, 2), 3);
        assert_eq!(drnl_hash(2, 1), 3);
        assert_eq!(drnl_hash(1, 3), 4);
        assert_eq!(drnl_hash(2, 2), 5);
        assert_eq!(drnl_hash(1, 4), 6);
        assert_eq!(drnl_hash(2, 3), 7);
    }

    #[test]
    fn test_drnl_path_graph_regression() {
        let subgraph = path_subgraph();
        assert_eq!(subgraph.nodes, vec![0, 4, 1, 3, 2]);

        // node 1: (1, 3) -> 4, node 3: (3, 1) -> 4, node 2: (2, 2) -> 5
        let z = NodeLabeling::Drnl.label(&subgraph).unwrap();
        assert_eq!(z, NodeLabels::Scalar(vec![1, 1, 4, 4, 5]));
        assert_eq!(z.max_label(), Some(5));
    }

    #[test]
    fn test_drnl_unreachable_nodes_get_zero() {
        // 3 hangs off the source only, so it cannot reach dst once src is deleted
        let adjacency = symmetric(4, &[(0, 2), (2, 1), (0, 3)]);
        let z = drnl_node_labeling(&adjacency, 0, 1).unwrap();
        assert_eq!(z, vec![1, 1, 2, 0]);
    }

    #[test]
    fn test_drnl_swaps_pair_order() {
        let adjacency = symmetric(4, &[(0, 2), (2, 1), (0, 3)]);
        assert_eq!(
            drnl_node_labeling(&adjacency, 1, 0).unwrap(),
            drnl_node_labeling(&adjacency, 0, 1).unwrap()
        );
    }

    #[test]
    fn test_drnl_non_adjacent_anchor_indices() {
        // Anchors at 1 and 3, so deleting 1 shifts 3 down to 2
        // 0 - 1 - 2 - 3, 4 attached to 3
        let adjacency = symmetric(5, &[(0, 1), (1, 2), (2, 3), (3, 4)]);
        let z = drnl_node_labeling(&adjacency, 3, 1).unwrap();
        // node 0: d1=1, d3 unreachable without 1 -> 0
        // node 2: (1, 1) -> 2, node 4: unreachable from 1 without 3 -> 0
        assert_eq!(z, vec![0, 1, 2, 1, 0]);
    }

    #[test]
    fn test_drnl_rejects_bad_pairs() {
        let adjacency = symmetric(3, &[(0, 1)]);
        assert!(matches!(
            drnl_node_labeling(&adjacency, 1, 1),
            Err(GraphError::InvalidLinkPair { .. })
        ));
        assert!(drnl_node_labeling(&adjacency, 0, 3).is_err());
    }

    #[test]
    fn test_distance_encoding() {
        let subgraph = path_subgraph();
        let z = NodeLabeling::DistanceEncoding { max_dist: 3 }.label(&subgraph).unwrap();
        assert_eq!(
            z,
            NodeLabels::Pair(vec![[0, 3], [3, 0], [1, 3], [3, 1], [2, 2]])
        );
    }

    #[test]
    fn test_distance_encoding_plus() {
        let subgraph = path_subgraph();
        let z = NodeLabeling::DistanceEncodingPlus { max_dist: 100 }.label(&subgraph).unwrap();
        assert_eq!(
            z,
            NodeLabels::Pair(vec![[0, 0], [0, 0], [1, 3], [3, 1], [2, 2]])
        );

        let adjacency = symmetric(4, &[(0, 2), (2, 1), (0, 3)]);
        let z = de_plus_node_labeling(&adjacency, 0, 1, 100).unwrap();
        assert_eq!(z[3], [1, 101]);
        let capped = de_plus_node_labeling(&adjacency, 0, 1, 0).unwrap();
        assert_eq!(capped[2], [0, 0]);
    }

    #[test]
    fn test_hop_and_zero_one() {
        let subgraph = path_subgraph();
        assert_eq!(
            NodeLabeling::Hop.label(&subgraph).unwrap(),
            NodeLabels::Scalar(vec![0, 0, 1, 1, 2])
        );
        assert_eq!(
            NodeLabeling::ZeroOne.label(&subgraph).unwrap(),
            NodeLabels::Scalar(vec![1, 1, 0, 0, 0])
        );
        assert_eq!(
            NodeLabeling::NoLabel.label(&subgraph).unwrap(),
            NodeLabels::Scalar(vec![0; 5])
        );
    }

    #[test]
    fn test_degree_is_capped() {
        let edges: Vec<(usize, usize)> = (1..=150).map(|leaf| (0, leaf)).collect();
        let graph = LinkGraph::undirected(151, &edges).unwrap();
        let sampler = KHopSampler::new(1, FringeSampler::unsampled(false));
        let subgraph = sampler.sample(&graph, 0, 1, 1, &mut Pcg64::seed_from_u64(0)).unwrap();

        let z = NodeLabeling::Degree.label(&subgraph).unwrap();
        let z = z.as_scalar().unwrap();
        assert_eq!(z[0], 100);
        assert_eq!(z[1], 0); // its only edge was the target link
        assert!(z[2..].iter().all(|&d| d == 1));
    }

    #[test]
    fn test_parse_label_names() {
        assert_eq!("drnl".parse::<NodeLabeling>().unwrap(), NodeLabeling::Drnl);
        assert_eq!("zo".parse::<NodeLabeling>().unwrap(), NodeLabeling::ZeroOne);
        assert_eq!("zero-one".parse::<NodeLabeling>().unwrap(), NodeLabeling::ZeroOne);
        assert_eq!(
            "de".parse::<NodeLabeling>().unwrap(),
            NodeLabeling::DistanceEncoding { max_dist: 3 }
        );
        assert_eq!(
            NodeLabeling::parse("de+", Some(7)).unwrap(),
            NodeLabeling::DistanceEncodingPlus { max_dist: 7 }
        );
        assert_eq!("none".parse::<NodeLabeling>().unwrap(), NodeLabeling::NoLabel);
        assert!(matches!(
            "drnl2".parse::<NodeLabeling>(),
            Err(GraphError::UnknownNodeLabeling(_))
        ));
        assert_eq!(NodeLabeling::default().to_string(), "drnl");
    }

    #[test]
    fn test_anchor_labels_on_random_graphs() {
        for seed in 0..5 {
            let graph = random_graph(15, 0.25, seed);
            let sampler = KHopSampler::new(2, FringeSampler::unsampled(false));
            let mut rng = Pcg64::seed_from_u64(seed);

            for _ in 0..10 {
                let src = rng.gen_range(0..15);
                let dst = (src + rng.gen_range(1..15)) % 15;
                let subgraph = sampler.sample(&graph, src, dst, 1, &mut rng).unwrap();

                let drnl = NodeLabeling::Drnl.label(&subgraph).unwrap();
                let drnl = drnl.as_scalar().unwrap();
                assert_eq!((drnl[0], drnl[1]), (1, 1));

                let zo = NodeLabeling::ZeroOne.label(&subgraph).unwrap();
                assert_eq!(&zo.as_scalar().unwrap()[..2], &[1, 1]);

                let de_plus = NodeLabeling::DistanceEncodingPlus { max_dist: 100 }
                    .label(&subgraph)
                    .unwrap();
                let de_plus = de_plus.as_pair().unwrap();
                assert_eq!((de_plus[0], de_plus[1]), ([0, 0], [0, 0]));
            }
        }
    }
}
