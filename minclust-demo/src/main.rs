use std::collections::HashMap;
use std::env;

use minclust::cluster::{ClusterConfig, MinHashCluster};

fn tokens(list: &[&str]) -> Vec<String> {
    list.iter().map(|token| token.to_string()).collect()
}

fn corpus() -> HashMap<String, Vec<String>> {
    let mut data = HashMap::new();
    data.insert(
        "user1".to_string(),
        tokens(&[
            "airplane", "banana", "cat", "dog", "elephant", "fruit", "google", "hobby",
            "internet", "jogging",
        ]),
    );
    data.insert(
        "user2".to_string(),
        tokens(&["cat", "dog", "elephant", "fruit", "google", "jogging", "kotlin"]),
    );
    data.insert("user3".to_string(), tokens(&["java", "rx", "yahoo", "zoo"]));
    data.insert("user4".to_string(), tokens(&["apple", "banana"]));
    data.insert("user5".to_string(), tokens(&["airplane"]));
    data.insert("user6".to_string(), tokens(&["bobby", "dog"]));
    data.insert(
        "user7".to_string(),
        tokens(&["train", "cat", "exercise", "healthy"]),
    );
    data.insert(
        "user8".to_string(),
        tokens(&["healthy", "dog", "exercise", "banana", "youtube"]),
    );
    data.insert(
        "user9".to_string(),
        tokens(&["java", "javascript", "rx", "zoo", "yahoo", "google", "github"]),
    );
    data.insert(
        "user10".to_string(),
        tokens(&["cook", "bobby", "dog", "youtube"]),
    );
    data.insert(
        "user11".to_string(),
        tokens(&["dance", "airplane", "trip", "elephant", "fruit", "google"]),
    );
    data
}

fn print_neighbors(cluster: &mut MinHashCluster<minclust::store::RedisStore>,
                   subjects: &[&String]) -> minclust::Result<()> {
    for subject in subjects {
        let neighbors = cluster.most_common(subject.as_str(), 5)?;
        println!("{}", subject);
        for neighbor in neighbors {
            println!("  {} ({})", neighbor.subject, neighbor.count);
        }
    }
    Ok(())
}

fn main() -> minclust::Result<()> {
    tracing_subscriber::fmt::init();

    let addr = env::var("MINCLUST_REDIS_ADDR").unwrap_or_else(|_| "localhost:6379".to_string());
    let db = env::var("MINCLUST_REDIS_DB")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(1);
    let config = ClusterConfig {
        addr,
        db,
        num_hashes: 128,
        seed: 1,
        load_data_per: 10000,
    };

    let data = corpus();
    let mut cluster = MinHashCluster::connect(&config)?;
    cluster.flush()?;
    cluster.update_cluster(&data)?;

    let mut subjects: Vec<&String> = data.keys().collect();
    subjects.sort();
    print_neighbors(&mut cluster, &subjects)?;

    // extend two subjects: user1 with tokens it already holds (a no-op),
    // user5 with a genuinely larger set
    let mut second_wave = HashMap::new();
    second_wave.insert("user1".to_string(), tokens(&["airplane", "banana", "cat"]));
    second_wave.insert(
        "user5".to_string(),
        tokens(&["hobby", "internet", "jogging", "banana", "cat", "dog"]),
    );
    cluster.update_cluster(&second_wave)?;

    println!("======== UPDATED ========");
    print_neighbors(&mut cluster, &subjects)?;
    Ok(())
}
