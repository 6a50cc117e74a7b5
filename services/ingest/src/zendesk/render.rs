use std::collections::HashMap;

use zensync_db::document::models::{
    article_document_id, ticket_document_id, Document, DocumentKind,
};
use zensync_db::zendesk::models::ZendeskCategory;

use super::models::{ZendeskArticle, ZendeskComment, ZendeskSection, ZendeskTicket, ZendeskUser};

const UNKNOWN_USER: &str = "Unknown user";

pub fn article_to_document(
    connector_id: i64,
    article: &ZendeskArticle,
    section: &ZendeskSection,
    category: &ZendeskCategory,
    author: Option<&ZendeskUser>,
) -> Document {
    let mut content = format!("{}\n\n", article.title);
    content.push_str(&format!("Category: {}\n", category.name));
    content.push_str(&format!("Section: {}\n", section.name));
    content.push_str(&format!(
        "Author: {}\n",
        author.map(|u| u.name.as_str()).unwrap_or(UNKNOWN_USER)
    ));
    if !article.label_names.is_empty() {
        content.push_str(&format!("Labels: {}\n", article.label_names.join(", ")));
    }
    content.push('\n');
    content.push_str(article.body.as_deref().unwrap_or_default());

    let mut tags = vec![
        format!("title:{}", article.title),
        format!("category:{}", category.name),
    ];
    tags.extend(article.label_names.iter().map(|l| format!("label:{l}")));

    Document {
        connector_id,
        document_id: article_document_id(connector_id, article.id),
        kind: DocumentKind::Article,
        title: article.title.clone(),
        source_url: article.html_url.clone(),
        content,
        tags,
        source_updated_at: article.updated_at,
    }
}

pub fn ticket_to_document(
    connector_id: i64,
    ticket: &ZendeskTicket,
    comments: &[ZendeskComment],
    users: &[ZendeskUser],
) -> Document {
    let names: HashMap<i64, &str> = users.iter().map(|u| (u.id, u.name.as_str())).collect();
    let name_of = |id: i64| names.get(&id).copied().unwrap_or(UNKNOWN_USER);

    let title = ticket
        .subject
        .clone()
        .unwrap_or_else(|| format!("Ticket #{}", ticket.id));

    let mut content = format!("{title}\n\n");
    content.push_str(&format!("Ticket: #{}\n", ticket.id));
    content.push_str(&format!("Status: {}\n", ticket.status.as_str()));
    if let Some(priority) = &ticket.priority {
        content.push_str(&format!("Priority: {priority}\n"));
    }
    if let Some(kind) = &ticket.ticket_type {
        content.push_str(&format!("Type: {kind}\n"));
    }
    if !ticket.tags.is_empty() {
        content.push_str(&format!("Tags: {}\n", ticket.tags.join(", ")));
    }
    if let Some(requester) = ticket.requester_id {
        content.push_str(&format!("Requester: {}\n", name_of(requester)));
    }

    content.push_str("\nConversation:\n");
    for comment in comments {
        content.push_str(&format!(
            "\n[{}] {}:\n{}\n",
            comment.created_at.to_rfc3339(),
            name_of(comment.author_id),
            comment.body.trim_end()
        ));
    }

    let mut tags = vec![format!("title:{title}")];
    tags.extend(ticket.tags.iter().map(|t| format!("tag:{t}")));

    Document {
        connector_id,
        document_id: ticket_document_id(connector_id, ticket.id),
        kind: DocumentKind::Ticket,
        title,
        source_url: ticket.url.clone(),
        content,
        tags,
        source_updated_at: ticket.updated_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use zensync_db::zendesk::models::ResourcePermission;

    use crate::zendesk::models::TicketStatus;

    fn category() -> ZendeskCategory {
        ZendeskCategory {
            connector_id: 1,
            brand_id: 2,
            category_id: 3,
            name: "Billing".to_string(),
            url: "https://acme.zendesk.com/hc/categories/3".to_string(),
            description: None,
            permission: ResourcePermission::Read,
            created_at: Utc::now(),
        }
    }

    fn article() -> ZendeskArticle {
        ZendeskArticle {
            id: 77,
            html_url: Some("https://acme.zendesk.com/hc/articles/77".to_string()),
            author_id: 5,
            section_id: 9,
            title: "Refunds".to_string(),
            body: Some("<p>Refunds take 5 days.</p>".to_string()),
            draft: false,
            label_names: vec!["money".to_string()],
            locale: Some("en-us".to_string()),
            created_at: Utc.with_ymd_and_hms(2026, 9, 1, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2026, 9, 2, 0, 0, 0).unwrap(),
        }
    }

    fn ticket() -> ZendeskTicket {
        ZendeskTicket {
            id: 12,
            url: None,
            subject: Some("Cannot log in".to_string()),
            status: TicketStatus::Solved,
            priority: Some("high".to_string()),
            ticket_type: Some("problem".to_string()),
            tags: vec!["login".to_string()],
            requester_id: Some(1),
            brand_id: Some(2),
            created_at: Utc.with_ymd_and_hms(2026, 9, 1, 0, 0, 0).unwrap(),
            updated_at: Utc.with_ymd_and_hms(2026, 9, 3, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn article_document_carries_metadata_and_body() {
        let section = ZendeskSection {
            id: 9,
            name: "Payments".to_string(),
            category_id: Some(3),
        };
        let author = ZendeskUser {
            id: 5,
            name: "Ada".to_string(),
            email: None,
        };
        let doc = article_to_document(1, &article(), &section, &category(), Some(&author));

        assert_eq!(doc.document_id, "zendesk-article-1-77");
        assert_eq!(doc.kind, DocumentKind::Article);
        assert!(doc.content.starts_with("Refunds\n\n"));
        assert!(doc.content.contains("Section: Payments"));
        assert!(doc.content.contains("Author: Ada"));
        assert!(doc.content.ends_with("<p>Refunds take 5 days.</p>"));
        assert!(doc.tags.contains(&"label:money".to_string()));
        assert_eq!(doc.source_updated_at, article().updated_at);
    }

    #[test]
    fn article_without_author_uses_placeholder() {
        let section = ZendeskSection {
            id: 9,
            name: "Payments".to_string(),
            category_id: Some(3),
        };
        let doc = article_to_document(1, &article(), &section, &category(), None);
        assert!(doc.content.contains("Author: Unknown user"));
    }

    #[test]
    fn ticket_document_includes_conversation_in_order() {
        let comments = vec![
            ZendeskComment {
                id: 1,
                author_id: 1,
                body: "It says wrong password".to_string(),
                public: true,
                created_at: Utc.with_ymd_and_hms(2026, 9, 1, 8, 0, 0).unwrap(),
            },
            ZendeskComment {
                id: 2,
                author_id: 99,
                body: "Reset done".to_string(),
                public: true,
                created_at: Utc.with_ymd_and_hms(2026, 9, 1, 9, 0, 0).unwrap(),
            },
        ];
        let users = vec![ZendeskUser {
            id: 1,
            name: "Grace".to_string(),
            email: None,
        }];

        let doc = ticket_to_document(4, &ticket(), &comments, &users);

        assert_eq!(doc.document_id, "zendesk-ticket-4-12");
        assert!(doc.content.contains("Status: solved"));
        assert!(doc.content.contains("Requester: Grace"));
        let first = doc.content.find("Grace:\nIt says wrong password").unwrap();
        let second = doc.content.find("Unknown user:\nReset done").unwrap();
        assert!(first < second);
    }

    #[test]
    fn ticket_without_subject_gets_numbered_title() {
        let mut t = ticket();
        t.subject = None;
        let doc = ticket_to_document(4, &t, &[], &[]);
        assert_eq!(doc.title, "Ticket #12");
    }
}
