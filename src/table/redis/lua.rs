// ARGV holds alternating attribute names and values.
pub(crate) static PUT_ITEM_SCRIPT: &str = r#"
    local key = KEYS[1]

    redis.call('DEL', key)
    if #ARGV > 0 then
        redis.call('HSET', key, unpack(ARGV))
    end

    return #ARGV / 2
"#;
