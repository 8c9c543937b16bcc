use super::*;

fn failing(n: u32) -> Result<String, ScrapeError> {
    Err(ScrapeError::Status {
        url: format!("attempt-{n}"),
        status: 503,
    })
}

#[test]
fn test_retry_stops_after_max_attempts() {
    let policy = RetryPolicy {
        max_attempts: 3,
        delay: Duration::from_secs(5),
    };
    let mut calls = Vec::new();
    let mut sleeps = Vec::new();

    let result = retry(
        &policy,
        "http://x",
        |n| {
            calls.push(n);
            failing(n)
        },
        |d| sleeps.push(d),
    );

    assert_eq!(calls, vec![1, 2, 3]);
    // no sleep after the last attempt
    assert_eq!(sleeps, vec![Duration::from_secs(5); 2]);
    match result {
        Err(ScrapeError::Exhausted { attempts, last, .. }) => {
            assert_eq!(attempts, 3);
            assert!(last.contains("attempt-3"));
        }
        other => panic!("expected Exhausted, got {other:?}"),
    }
}

#[test]
fn test_retry_returns_first_success() {
    let policy = RetryPolicy::default();
    let mut sleeps = 0;
    let result = retry(
        &policy,
        "http://x",
        |n| if n == 1 { failing(n) } else { Ok("body".to_string()) },
        |_| sleeps += 1,
    );
    assert_eq!(result.unwrap(), "body");
    assert_eq!(sleeps, 1);
}

#[test]
fn test_zero_attempts_means_one() {
    let policy = RetryPolicy {
        max_attempts: 0,
        delay: Duration::ZERO,
    };
    let mut calls = 0;
    let result = retry(
        &policy,
        "http://x",
        |n| {
            calls += 1;
            failing(n)
        },
        |_| {},
    );
    assert_eq!(calls, 1);
    assert!(result.is_err());
}

#[test]
fn test_default_policy() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.max_attempts, 2);
    assert_eq!(policy.delay, Duration::from_secs(5));
}

#[test]
fn test_politeness_stays_in_bounds() {
    let politeness = Politeness {
        min: Duration::from_millis(100),
        max: Duration::from_millis(200),
    };
    for _ in 0..50 {
        let d = politeness.pick();
        assert!(d >= politeness.min && d <= politeness.max);
    }
    assert_eq!(Politeness::none().pick(), Duration::ZERO);
    let inverted = Politeness {
        min: Duration::from_millis(300),
        max: Duration::from_millis(100),
    };
    assert_eq!(inverted.pick(), Duration::from_millis(300));
}

#[test]
fn test_client_builds_with_defaults() {
    assert!(HttpClient::new(ClientConfig::default()).is_ok());
}
