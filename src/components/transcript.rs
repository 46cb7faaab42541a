use yew::prelude::*;

use crate::types::{Turn, UserIdentity};

const BOT_AVATAR: &str = "🤖";

/// One row of the rendered transcript.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Entry {
    Bubble {
        from_user: bool,
        avatar: String,
        content: String,
        timestamp: String,
    },
    Typing,
}

/// Projects the transcript into display rows. The typing indicator is not a
/// turn; it only trails the list while a reply is pending.
pub fn project(turns: &[Turn], pending: bool, user: &UserIdentity) -> Vec<Entry> {
    let initial = user.initial();
    let mut entries: Vec<Entry> = turns
        .iter()
        .map(|turn| Entry::Bubble {
            from_user: turn.is_user(),
            avatar: if turn.is_user() { initial.clone() } else { BOT_AVATAR.to_string() },
            content: turn.content.clone(),
            timestamp: turn.timestamp.clone(),
        })
        .collect();
    if pending {
        entries.push(Entry::Typing);
    }
    entries
}

fn render_entry(entry: &Entry) -> Html {
    match entry {
        Entry::Bubble { from_user, avatar, content, timestamp } => {
            let (justify, radius, bg, fg) = if *from_user {
                ("flex-end", "20px 20px 4px 20px", "#6c5ce7", "white")
            } else {
                ("flex-start", "20px 20px 20px 4px", "#f8f9fa", "#2d3436")
            };
            let avatar_html = html! {
                <div style={format!(
                    "width:32px; height:32px; border-radius:50%; display:flex; align-items:center; justify-content:center; font-size:14px; color:white; background:{}; {}",
                    if *from_user { "#00b894" } else { "#6c5ce7" },
                    if *from_user { "margin-left:8px;" } else { "margin-right:8px;" }
                )}>
                    { avatar }
                </div>
            };
            html! {
                <div style={format!("display:flex; justify-content:{}; align-items:flex-end; margin-bottom:1em;", justify)}>
                    { if !*from_user { avatar_html.clone() } else { html! {} } }
                    <div style={format!("max-width:50%; display:flex; flex-direction:column; align-items:{};", justify)}>
                        <div style={format!(
                            "padding:1em; border-radius:{}; background:{}; color:{}; box-shadow:0 2px 8px rgba(0,0,0,0.1); word-break:break-word; font-size:14px; line-height:1.4; white-space:pre-wrap;",
                            radius, bg, fg
                        )}>
                            { content }
                        </div>
                        <span style="color:#74b9ff; font-size:11px; margin-top:0.25em; padding:0 0.5em;">
                            { timestamp }
                        </span>
                    </div>
                    { if *from_user { avatar_html } else { html! {} } }
                </div>
            }
        }
        Entry::Typing => html! {
            <div style="display:flex; justify-content:flex-start; margin-bottom:1em;">
                <div style="padding:1em; border-radius:20px 20px 20px 4px; background:#f8f9fa; display:flex; align-items:center; gap:0.5em;">
                    <div class="spinner" style="
                        width:16px; height:16px;
                        border:2px solid #f3f3f3;
                        border-top:2px solid #6c5ce7;
                        border-radius:50%;
                        animation:spin 1s linear infinite;
                    "></div>
                    <span style="color:#636e72; font-size:0.9em;">{ "Typing..." }</span>
                </div>
            </div>
        },
    }
}

#[derive(Properties, PartialEq)]
pub struct TranscriptViewProps {
    pub turns: Vec<Turn>,
    pub pending: bool,
    pub user: UserIdentity,
}

#[function_component(TranscriptView)]
pub fn transcript_view(props: &TranscriptViewProps) -> Html {
    let end_ref = use_node_ref();

    // Keep the newest entry in view.
    {
        let end_ref = end_ref.clone();
        use_effect_with((props.turns.len(), props.pending), move |_| {
            if let Some(el) = end_ref.cast::<web_sys::Element>() {
                el.scroll_into_view();
            }
            || ()
        });
    }

    let entries = project(&props.turns, props.pending, &props.user);

    html! {
        <div style="flex:1; overflow-y:auto; padding:2em 3em; max-width:900px; width:100%; margin:0 auto; box-sizing:border-box;">
            { if entries.is_empty() {
                html! {
                    <div style="height:100%; display:flex; flex-direction:column; align-items:center; justify-content:center;">
                        <h3 style="color:#74b9ff; margin:0 0 0.5em 0;">{ "Hello! I'm your Employee Self Service Bot" }</h3>
                        <div style="color:#636e72; text-align:center; font-size:0.9em;">
                            { "Ask me anything about HR policies, leave requests, or general questions" }
                        </div>
                    </div>
                }
            } else {
                html! { <>{ for entries.iter().map(render_entry) }</> }
            }}
            <div ref={end_ref} />
        </div>
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserIdentity {
        UserIdentity {
            email: "ana@corp.com".to_string(),
        }
    }

    #[test]
    fn test_project_keeps_order_and_sides() {
        let turns = vec![Turn::user("hi", "09:00 AM"), Turn::assistant("hello", "09:01 AM")];
        let entries = project(&turns, false, &user());
        assert_eq!(
            entries,
            vec![
                Entry::Bubble {
                    from_user: true,
                    avatar: "A".to_string(),
                    content: "hi".to_string(),
                    timestamp: "09:00 AM".to_string(),
                },
                Entry::Bubble {
                    from_user: false,
                    avatar: BOT_AVATAR.to_string(),
                    content: "hello".to_string(),
                    timestamp: "09:01 AM".to_string(),
                },
            ]
        );
    }

    #[test]
    fn test_typing_indicator_trails_when_pending() {
        let turns = vec![Turn::user("hi", "09:00 AM")];
        let entries = project(&turns, true, &user());
        assert_eq!(entries.len(), 2);
        assert_eq!(entries.last(), Some(&Entry::Typing));
        assert!(!project(&turns, false, &user()).contains(&Entry::Typing));
    }

    #[test]
    fn test_empty_transcript() {
        assert!(project(&[], false, &user()).is_empty());
        assert_eq!(project(&[], true, &user()), vec![Entry::Typing]);
    }
}
